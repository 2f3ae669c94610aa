//! cfn-purge - delete CloudFormation stacks that hold non-empty ECR repositories
//!
//! CloudFormation cannot delete an ECR repository that still contains
//! images, so deleting such a stack fails half-way. This crate empties
//! every repository in the stack first and only then requests the stack
//! deletion.

pub mod aws;
pub mod config;
pub mod output;
pub mod purge;
