//! Data model for a stack purge
//!
//! All values here are produced by remote listings and only read locally.

use serde::Serialize;
use std::fmt;

/// One member resource of a CloudFormation stack
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StackResourceSummary {
    /// Physical resource id (for ECR repositories, the repository name)
    pub physical_id: String,
    /// CloudFormation resource type, e.g. `AWS::ECR::Repository`
    pub resource_type: String,
}

impl StackResourceSummary {
    pub fn new(physical_id: impl Into<String>, resource_type: impl Into<String>) -> Self {
        Self {
            physical_id: physical_id.into(),
            resource_type: resource_type.into(),
        }
    }
}

/// Physical id of a stack member known to be a content-bearing repository
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RepositoryHandle(String);

impl RepositoryHandle {
    pub fn new(physical_id: impl Into<String>) -> Self {
        Self(physical_id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RepositoryHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

/// Opaque reference to one unit of content (an image digest)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ContentIdentifier(String);

impl ContentIdentifier {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for ContentIdentifier {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// An identifier the remote bulk-delete reported it could not delete
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PurgeFailure {
    pub identifier: ContentIdentifier,
    /// Service failure code, e.g. `ImageReferencedByManifestList`
    pub code: String,
    /// Human-readable reason from the service
    pub reason: String,
}

impl PurgeFailure {
    pub fn new(
        identifier: impl Into<ContentIdentifier>,
        code: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            code: code.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for PurgeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.identifier, self.code, self.reason)
    }
}
