//! Outcome of a cascade run

use cfn_purge_common::{PurgeFailure, RepositoryHandle};
use serde::Serialize;
use thiserror::Error;

/// Images one repository could not delete
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryFailure {
    pub repository: RepositoryHandle,
    pub failures: Vec<PurgeFailure>,
}

/// Terminal value of one `StackPurger::cascade_delete` run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CascadeResult {
    pub stack_name: String,
    /// Repositories left empty, in classification order
    pub purged_repositories: Vec<RepositoryHandle>,
    /// Repositories that still hold images, in classification order
    pub failures: Vec<RepositoryFailure>,
    /// Whether the stack deletion was requested
    pub stack_deleted: bool,
}

impl CascadeResult {
    pub fn is_success(&self) -> bool {
        self.stack_deleted && self.failures.is_empty()
    }

    pub fn failed_repositories(&self) -> impl Iterator<Item = &RepositoryHandle> {
        self.failures.iter().map(|f| &f.repository)
    }

    /// Turn a run that left the stack in place into an `IncompletePurge` error
    pub fn ensure_stack_deleted(self) -> Result<Self, IncompletePurge> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(IncompletePurge {
                stack_name: self.stack_name,
                failures: self.failures,
            })
        }
    }
}

/// Some repositories kept images, so the stack was not deleted
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "failed to delete images of {}; stack '{stack_name}' was NOT deleted, remove the remaining images manually",
    describe_failures(.failures)
)]
pub struct IncompletePurge {
    pub stack_name: String,
    pub failures: Vec<RepositoryFailure>,
}

fn describe_failures(failures: &[RepositoryFailure]) -> String {
    failures
        .iter()
        .map(|f| match f.failures.first() {
            Some(first) => format!(
                "{} ({} failed, first: {} {})",
                f.repository,
                f.failures.len(),
                first.identifier,
                first.code
            ),
            None => f.repository.to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failed_result() -> CascadeResult {
        CascadeResult {
            stack_name: "foo".to_string(),
            purged_repositories: vec![RepositoryHandle::new("api")],
            failures: vec![
                RepositoryFailure {
                    repository: RepositoryHandle::new("web"),
                    failures: vec![
                        PurgeFailure::new("d1", "ImageReferencedByManifestList", "in use"),
                        PurgeFailure::new("d2", "ImageNotFound", "gone"),
                    ],
                },
                RepositoryFailure {
                    repository: RepositoryHandle::new("batch"),
                    failures: vec![PurgeFailure::new("d9", "KmsError", "key disabled")],
                },
            ],
            stack_deleted: false,
        }
    }

    #[test]
    fn test_incomplete_purge_names_every_repository() {
        let err = failed_result().ensure_stack_deleted().unwrap_err();
        let message = err.to_string();

        assert!(message.contains("web (2 failed, first: d1 ImageReferencedByManifestList)"));
        assert!(message.contains("batch (1 failed, first: d9 KmsError)"));
        assert!(message.contains("stack 'foo' was NOT deleted"));
    }

    #[test]
    fn test_success_passes_through() {
        let result = CascadeResult {
            stack_name: "foo".to_string(),
            purged_repositories: vec![RepositoryHandle::new("web")],
            failures: vec![],
            stack_deleted: true,
        };
        assert!(result.is_success());
        assert_eq!(result.clone().ensure_stack_deleted().unwrap(), result);
    }

    #[test]
    fn test_failed_repositories() {
        let result = failed_result();
        let names: Vec<_> = result.failed_repositories().map(|r| r.as_str()).collect();
        assert_eq!(names, vec!["web", "batch"]);
    }
}
