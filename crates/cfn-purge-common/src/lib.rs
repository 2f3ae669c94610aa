//! cfn-purge-common - shared types for the stack purge tool
//!
//! This crate holds the pieces shared by the coordinator crate and the
//! test doubles: the data model, the remote error type, the service
//! traits and the pagination driver.

pub mod defaults;
pub mod error;
pub mod operations;
pub mod paging;
pub mod types;

pub use error::RemoteError;
pub use operations::{RepositoryOperations, StackOperations};
pub use paging::{Page, drain_pages};
pub use types::{ContentIdentifier, PurgeFailure, RepositoryHandle, StackResourceSummary};
