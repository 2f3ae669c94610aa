//! AWS client modules
//!
//! This module provides wrappers around AWS SDK clients for:
//! - CloudFormation: stack member listing and stack deletion
//! - ECR: image listing and batch image deletion

pub mod cloudformation;
pub mod context;
pub mod ecr;
pub mod error;

pub use cloudformation::CloudFormationClient;
pub use context::AwsContext;
pub use ecr::EcrClient;
pub use error::remote_error;

/// Normalize a continuation token; an empty token ends the listing.
pub(crate) fn next_page_token(token: Option<&str>) -> Option<String> {
    token.filter(|t| !t.is_empty()).map(str::to_string)
}
