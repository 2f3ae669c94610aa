//! Shared test utilities for cfn-purge
//!
//! ## Modules
//!
//! - [`aws`]: AWS region detection and unique test name generation
//! - [`scripted`]: in-memory CloudFormation/ECR doubles with scripted pages

pub mod aws;
pub mod scripted;

// Re-export commonly used items
pub use aws::{get_test_region, test_run_id};
pub use scripted::{
    Call, CallKind, CallLog, ScriptedRegistry, ScriptedStack, digests, ecr_repository, resource,
};
