//! Progress reporting for a stack purge
//!
//! The coordinator reports phase changes and per-repository outcomes
//! through `PurgeProgress`, so the same purge logic can feed log output
//! or a test recorder.

use cfn_purge_common::{PurgeFailure, RepositoryHandle};
use std::fmt;
use tracing::{info, warn};

/// Phase of a cascade run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CascadePhase {
    /// Draining the stack's member listing
    Listing,
    /// Selecting content-bearing repositories from the members
    Classifying,
    /// Emptying repository `index` of `total` (zero-based)
    PurgingRepository {
        index: usize,
        total: usize,
        repository: RepositoryHandle,
    },
    /// Requesting the stack deletion
    DeletingParent,
    /// Stack deletion requested
    Done,
    /// Some repositories kept content; the stack was left in place
    Failed { repositories: usize },
    /// A remote call failed and the run stopped
    Aborted { operation: &'static str },
}

impl fmt::Display for CascadePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CascadePhase::Listing => write!(f, "listing stack resources"),
            CascadePhase::Classifying => write!(f, "classifying stack resources"),
            CascadePhase::PurgingRepository {
                index,
                total,
                repository,
            } => write!(f, "purging repository {repository} ({}/{total})", index + 1),
            CascadePhase::DeletingParent => write!(f, "deleting stack"),
            CascadePhase::Done => write!(f, "done"),
            CascadePhase::Failed { repositories } => {
                write!(f, "failed: {repositories} repositories still hold images")
            }
            CascadePhase::Aborted { operation } => write!(f, "aborted: {operation} failed"),
        }
    }
}

/// Trait for reporting purge progress
pub trait PurgeProgress: Send + Sync {
    /// Report a phase change
    fn report_phase(&self, phase: &CascadePhase);

    /// Report that a repository is now empty
    fn report_repository_purged(&self, repository: &RepositoryHandle, image_count: usize);

    /// Report the images a repository could not delete
    fn report_repository_failed(&self, repository: &RepositoryHandle, failures: &[PurgeFailure]);
}

/// Progress reporter that logs through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgress;

impl PurgeProgress for LogProgress {
    fn report_phase(&self, phase: &CascadePhase) {
        info!(phase = %phase, "Purge phase");
    }

    fn report_repository_purged(&self, repository: &RepositoryHandle, image_count: usize) {
        info!(
            repository = %repository,
            images = image_count,
            "All images in {repository} successfully deleted"
        );
    }

    fn report_repository_failed(&self, repository: &RepositoryHandle, failures: &[PurgeFailure]) {
        for failure in failures {
            warn!(
                repository = %repository,
                image = %failure.identifier,
                code = %failure.code,
                reason = %failure.reason,
                "Image not deleted"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_display_is_one_based() {
        let phase = CascadePhase::PurgingRepository {
            index: 0,
            total: 2,
            repository: RepositoryHandle::new("web"),
        };
        assert_eq!(phase.to_string(), "purging repository web (1/2)");
    }
}
