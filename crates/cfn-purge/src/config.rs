//! Configuration types for a purge run

use cfn_purge_common::defaults::{DEFAULT_REGION, DEFAULT_REPOSITORY_TYPE};
use thiserror::Error;

/// AWS connection settings
#[derive(Debug, Clone)]
pub struct AwsConfig {
    /// AWS region
    pub region: String,
    /// AWS profile name (overrides default credential resolution)
    pub profile: Option<String>,
}

impl Default for AwsConfig {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            profile: None,
        }
    }
}

/// How the run result is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Complete configuration for one purge run
#[derive(Debug, Clone)]
pub struct PurgeConfig {
    /// Stack to purge
    pub stack_name: String,
    /// CloudFormation type of the repositories to empty
    pub resource_type: String,
    pub aws: AwsConfig,
    pub format: OutputFormat,
}

impl PurgeConfig {
    pub fn new(stack_name: impl Into<String>) -> Self {
        Self {
            stack_name: stack_name.into(),
            resource_type: DEFAULT_REPOSITORY_TYPE.to_string(),
            aws: AwsConfig::default(),
            format: OutputFormat::default(),
        }
    }

    /// Check required fields before any remote call is made
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.stack_name.trim().is_empty() {
            return Err(ConfigError::EmptyStackName);
        }
        if self.resource_type.trim().is_empty() {
            return Err(ConfigError::EmptyResourceType);
        }
        if self.aws.region.trim().is_empty() {
            return Err(ConfigError::EmptyRegion);
        }
        Ok(())
    }
}

/// Configuration validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("stack name cannot be empty")]
    EmptyStackName,

    #[error("resource type cannot be empty")]
    EmptyResourceType,

    #[error("region cannot be empty")]
    EmptyRegion,
}
