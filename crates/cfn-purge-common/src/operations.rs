//! Service traits the purge coordinator depends on
//!
//! These traits abstract the CloudFormation and ECR calls so the
//! coordinator can be driven by scripted doubles in tests without
//! hitting real AWS.

use crate::error::RemoteError;
use crate::paging::Page;
use crate::types::{ContentIdentifier, PurgeFailure, RepositoryHandle, StackResourceSummary};
use std::future::Future;

/// Stack service: member listing and stack deletion
pub trait StackOperations: Send + Sync {
    /// List one page of the stack's member resources
    fn list_stack_resources(
        &self,
        stack_name: &str,
        next_token: Option<String>,
    ) -> impl Future<Output = Result<Page<StackResourceSummary>, RemoteError>> + Send;

    /// Request deletion of the stack itself
    fn delete_stack(&self, stack_name: &str) -> impl Future<Output = Result<(), RemoteError>> + Send;
}

/// Repository service: content listing and bulk content deletion
pub trait RepositoryOperations: Send + Sync {
    /// List one page of content identifiers held by a repository
    fn list_images(
        &self,
        repository: &RepositoryHandle,
        next_token: Option<String>,
    ) -> impl Future<Output = Result<Page<ContentIdentifier>, RemoteError>> + Send;

    /// Delete the given identifiers, returning the ones the service refused.
    ///
    /// `image_ids` must not be empty.
    fn batch_delete_images(
        &self,
        repository: &RepositoryHandle,
        image_ids: &[ContentIdentifier],
    ) -> impl Future<Output = Result<Vec<PurgeFailure>, RemoteError>> + Send;
}
