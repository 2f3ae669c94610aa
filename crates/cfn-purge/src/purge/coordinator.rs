//! Cascade coordinator
//!
//! Drives one stack purge through its phases:
//!
//! 1. drain the stack's member listing
//! 2. pick out the content-bearing repositories
//! 3. empty each repository in order (enumerate, then bulk delete)
//! 4. if no repository reported failures, request the stack deletion
//!
//! Repositories are processed one at a time. A remote error at any point
//! stops the run; repositories emptied before that stay empty. Per-image
//! failures do not stop the run, every repository is still attempted,
//! but they keep the stack from being deleted.

use super::classify::classify;
use super::content::{enumerate, purge};
use super::progress::{CascadePhase, LogProgress, PurgeProgress};
use super::result::{CascadeResult, RepositoryFailure};
use cfn_purge_common::defaults::DEFAULT_REPOSITORY_TYPE;
use cfn_purge_common::{RemoteError, RepositoryOperations, StackOperations, drain_pages};
use tracing::{debug, info, warn};

/// Deletes a stack after emptying its repositories
pub struct StackPurger<S, R, P = LogProgress> {
    stacks: S,
    registry: R,
    progress: P,
    repository_type: String,
}

impl<S, R> StackPurger<S, R>
where
    S: StackOperations,
    R: RepositoryOperations,
{
    /// Create a purger targeting `AWS::ECR::Repository` members
    pub fn new(stacks: S, registry: R) -> Self {
        Self {
            stacks,
            registry,
            progress: LogProgress,
            repository_type: DEFAULT_REPOSITORY_TYPE.to_string(),
        }
    }
}

impl<S, R, P> StackPurger<S, R, P>
where
    S: StackOperations,
    R: RepositoryOperations,
    P: PurgeProgress,
{
    /// Replace the progress reporter
    pub fn with_progress<Q: PurgeProgress>(self, progress: Q) -> StackPurger<S, R, Q> {
        StackPurger {
            stacks: self.stacks,
            registry: self.registry,
            progress,
            repository_type: self.repository_type,
        }
    }

    /// Override the resource type treated as a content-bearing repository
    pub fn with_repository_type(mut self, resource_type: impl Into<String>) -> Self {
        self.repository_type = resource_type.into();
        self
    }

    pub fn repository_type(&self) -> &str {
        &self.repository_type
    }

    /// Empty every repository in the stack, then delete the stack.
    ///
    /// Returns `Err` when a remote call fails. Returns `Ok` with
    /// `stack_deleted == false` when some repository kept images; in that
    /// case the stack deletion was never requested.
    pub async fn cascade_delete(&self, stack_name: &str) -> Result<CascadeResult, RemoteError> {
        let outcome = self.run(stack_name).await;

        match &outcome {
            Ok(result) if result.stack_deleted => self.progress.report_phase(&CascadePhase::Done),
            Ok(result) => self.progress.report_phase(&CascadePhase::Failed {
                repositories: result.failures.len(),
            }),
            Err(e) => {
                warn!(stack = %stack_name, error = %e, "Stack purge aborted");
                self.progress.report_phase(&CascadePhase::Aborted {
                    operation: e.operation,
                });
            }
        }

        outcome
    }

    async fn run(&self, stack_name: &str) -> Result<CascadeResult, RemoteError> {
        self.progress.report_phase(&CascadePhase::Listing);
        info!(stack = %stack_name, "Listing stack resources");
        let stacks = &self.stacks;
        let resources =
            drain_pages(move |token| stacks.list_stack_resources(stack_name, token)).await?;

        self.progress.report_phase(&CascadePhase::Classifying);
        let repositories = classify(&resources, &self.repository_type);
        info!(
            stack = %stack_name,
            resources = resources.len(),
            repositories = repositories.len(),
            resource_type = %self.repository_type,
            "Classified stack resources"
        );

        let total = repositories.len();
        let mut purged_repositories = Vec::with_capacity(total);
        let mut failures = Vec::new();

        for (index, repository) in repositories.into_iter().enumerate() {
            self.progress.report_phase(&CascadePhase::PurgingRepository {
                index,
                total,
                repository: repository.clone(),
            });

            let images = enumerate(&self.registry, &repository).await?;
            if images.is_empty() {
                debug!(repository = %repository, "Repository already empty");
                self.progress.report_repository_purged(&repository, 0);
                purged_repositories.push(repository);
                continue;
            }

            info!(repository = %repository, count = images.len(), "Deleting images");
            let repo_failures = purge(&self.registry, &repository, &images).await?;

            if repo_failures.is_empty() {
                self.progress
                    .report_repository_purged(&repository, images.len());
                purged_repositories.push(repository);
            } else {
                self.progress
                    .report_repository_failed(&repository, &repo_failures);
                failures.push(RepositoryFailure {
                    repository,
                    failures: repo_failures,
                });
            }
        }

        if !failures.is_empty() {
            warn!(
                stack = %stack_name,
                failed_repositories = failures.len(),
                "Repositories still hold images, not deleting stack"
            );
            return Ok(CascadeResult {
                stack_name: stack_name.to_string(),
                purged_repositories,
                failures,
                stack_deleted: false,
            });
        }

        self.progress.report_phase(&CascadePhase::DeletingParent);
        self.stacks.delete_stack(stack_name).await?;
        info!(stack = %stack_name, "Stack deletion requested");

        Ok(CascadeResult {
            stack_name: stack_name.to_string(),
            purged_repositories,
            failures,
            stack_deleted: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cfn_purge_common::{PurgeFailure, RepositoryHandle};
    use cfn_purge_test_utils::{
        CallKind, CallLog, ScriptedRegistry, ScriptedStack, digests, ecr_repository, resource,
    };
    use std::sync::{Arc, Mutex};

    /// Progress reporter that records every event as a string
    #[derive(Clone, Default)]
    struct RecordingProgress {
        events: Arc<Mutex<Vec<String>>>,
    }

    impl RecordingProgress {
        fn events(&self) -> Vec<String> {
            self.events.lock().unwrap().clone()
        }
    }

    impl PurgeProgress for RecordingProgress {
        fn report_phase(&self, phase: &CascadePhase) {
            self.events.lock().unwrap().push(phase.to_string());
        }

        fn report_repository_purged(&self, repository: &RepositoryHandle, image_count: usize) {
            self.events
                .lock()
                .unwrap()
                .push(format!("purged {repository} ({image_count})"));
        }

        fn report_repository_failed(&self, repository: &RepositoryHandle, failures: &[PurgeFailure]) {
            self.events
                .lock()
                .unwrap()
                .push(format!("failed {repository} ({})", failures.len()));
        }
    }

    #[tokio::test]
    async fn test_progress_follows_phases() {
        let log = CallLog::new();
        let stacks = ScriptedStack::new(&log).with_page(
            "foo",
            None,
            vec![ecr_repository("web"), ecr_repository("api")],
            None,
        );
        let registry = ScriptedRegistry::new(&log)
            .with_page("web", None, digests(&["d1", "d2"]), None)
            .with_page("api", None, vec![], None);
        let progress = RecordingProgress::default();

        let purger = StackPurger::new(stacks, registry).with_progress(progress.clone());
        let result = purger.cascade_delete("foo").await.unwrap();

        assert!(result.is_success());
        assert_eq!(
            progress.events(),
            vec![
                "listing stack resources",
                "classifying stack resources",
                "purging repository web (1/2)",
                "purged web (2)",
                "purging repository api (2/2)",
                "purged api (0)",
                "deleting stack",
                "done",
            ]
        );
    }

    #[tokio::test]
    async fn test_failed_purge_reports_failed_phase() {
        let log = CallLog::new();
        let stacks =
            ScriptedStack::new(&log).with_page("foo", None, vec![ecr_repository("web")], None);
        let registry = ScriptedRegistry::new(&log)
            .with_page("web", None, digests(&["d1"]), None)
            .with_delete_failures(
                "web",
                vec![PurgeFailure::new("d1", "ImageReferencedByManifestList", "in use")],
            );
        let progress = RecordingProgress::default();

        let purger = StackPurger::new(stacks, registry).with_progress(progress.clone());
        let result = purger.cascade_delete("foo").await.unwrap();

        assert!(!result.stack_deleted);
        assert_eq!(log.count(CallKind::DeleteStack), 0);
        let events = progress.events();
        assert!(events.contains(&"failed web (1)".to_string()));
        assert_eq!(
            events.last().map(String::as_str),
            Some("failed: 1 repositories still hold images")
        );
    }

    #[tokio::test]
    async fn test_abort_reports_failing_operation() {
        let log = CallLog::new();
        let stacks =
            ScriptedStack::new(&log).with_page("foo", None, vec![ecr_repository("web")], None);
        let registry = ScriptedRegistry::new(&log)
            .with_page("web", None, digests(&["d1"]), None)
            .with_delete_error(
                "web",
                RemoteError::new("BatchDeleteImage", Some("AccessDeniedException"), "denied"),
            );
        let progress = RecordingProgress::default();

        let purger = StackPurger::new(stacks, registry).with_progress(progress.clone());
        let err = purger.cascade_delete("foo").await.unwrap_err();

        assert_eq!(err.operation, "BatchDeleteImage");
        assert_eq!(log.count(CallKind::DeleteStack), 0);
        assert_eq!(
            progress.events().last().map(String::as_str),
            Some("aborted: BatchDeleteImage failed")
        );
    }

    #[tokio::test]
    async fn test_custom_repository_type() {
        let log = CallLog::new();
        let stacks = ScriptedStack::new(&log).with_page(
            "foo",
            None,
            vec![
                ecr_repository("private"),
                resource("public", "AWS::ECR::PublicRepository"),
            ],
            None,
        );
        let registry =
            ScriptedRegistry::new(&log).with_page("public", None, digests(&["d1"]), None);

        let purger = StackPurger::new(stacks, registry)
            .with_repository_type("AWS::ECR::PublicRepository");
        assert_eq!(purger.repository_type(), "AWS::ECR::PublicRepository");

        let result = purger.cascade_delete("foo").await.unwrap();
        assert_eq!(result.purged_repositories, vec![RepositoryHandle::new("public")]);
        assert_eq!(log.count(CallKind::ListImages), 1);
    }
}
