//! Remote service errors
//!
//! Every failed CloudFormation or ECR call is reduced to a `RemoteError`
//! carrying the service error code, so callers can classify it with
//! `.code` instead of matching on Debug output.

use thiserror::Error;

/// A failed remote call: transport, authorization or validation error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{operation} failed: {message}{}", code_suffix(.code))]
pub struct RemoteError {
    /// API operation that failed, e.g. `ListStackResources`
    pub operation: &'static str,
    /// Service error code, when the service returned one
    pub code: Option<String>,
    pub message: String,
}

impl RemoteError {
    pub fn new(
        operation: &'static str,
        code: Option<impl Into<String>>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            operation,
            code: code.map(Into::into),
            message: message.into(),
        }
    }

    /// Check if the target stack or repository does not exist
    pub fn is_not_found(&self) -> bool {
        match self.code.as_deref() {
            Some(c) if NOT_FOUND_CODES.contains(&c) => true,
            // CloudFormation reports missing stacks as a validation error
            Some("ValidationError") => self.message.contains("does not exist"),
            _ => false,
        }
    }

    /// Check if the caller lacks the IAM permission for this call
    pub fn is_access_denied(&self) -> bool {
        self.code
            .as_deref()
            .is_some_and(|c| ACCESS_DENIED_CODES.contains(&c))
    }

    /// Check if the call was rejected by rate limiting
    pub fn is_throttled(&self) -> bool {
        self.code
            .as_deref()
            .is_some_and(|c| THROTTLING_CODES.contains(&c))
    }

    /// Get a user-friendly suggestion for resolving this error, if available.
    pub fn suggestion(&self) -> Option<String> {
        if self.is_access_denied() {
            Some(format!(
                "Configure credentials with the following permissions: {}",
                REQUIRED_PERMISSIONS.join(", ")
            ))
        } else if self.is_throttled() {
            Some("AWS API rate limit hit. Wait a moment and run the command again.".to_string())
        } else if self.is_not_found() {
            Some("Check the stack name and that --region matches the stack's region.".to_string())
        } else {
            None
        }
    }
}

fn code_suffix(code: &Option<String>) -> String {
    code.as_deref().map(|c| format!(" ({c})")).unwrap_or_default()
}

/// IAM permissions needed to purge a stack
pub const REQUIRED_PERMISSIONS: &[&str] = &[
    "cloudformation:ListStackResources",
    "cloudformation:DeleteStack",
    "ecr:DescribeImages",
    "ecr:BatchDeleteImage",
];

/// Known error codes for "not found" conditions. Missing stacks have no
/// dedicated code, see `is_not_found`.
const NOT_FOUND_CODES: &[&str] = &["RepositoryNotFoundException"];

/// Known error codes for missing permissions
const ACCESS_DENIED_CODES: &[&str] = &[
    "AccessDenied",
    "AccessDeniedException",
    "UnauthorizedOperation",
];

/// Known error codes for throttling/rate limiting
const THROTTLING_CODES: &[&str] = &["Throttling", "ThrottlingException", "RequestLimitExceeded"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_operation_and_code() {
        let err = RemoteError::new("DeleteStack", Some("AccessDenied"), "not authorized");
        assert_eq!(err.to_string(), "DeleteStack failed: not authorized (AccessDenied)");

        let err = RemoteError::new("DescribeImages", None::<String>, "connection reset");
        assert_eq!(err.to_string(), "DescribeImages failed: connection reset");
    }

    #[test]
    fn not_found_codes() {
        for code in NOT_FOUND_CODES {
            let err = RemoteError::new("DescribeImages", Some(*code), "msg");
            assert!(err.is_not_found(), "Expected not found for code: {code}");
        }
    }

    #[test]
    fn missing_stack_validation_error() {
        let err = RemoteError::new(
            "ListStackResources",
            Some("ValidationError"),
            "Stack with id foo does not exist",
        );
        assert!(err.is_not_found());

        let other = RemoteError::new("ListStackResources", Some("ValidationError"), "bad token");
        assert!(!other.is_not_found());

        let unreported = RemoteError::new("DeleteStack", Some("StackNotFoundException"), "msg");
        assert!(!unreported.is_not_found());
    }

    #[test]
    fn access_denied_suggests_permissions() {
        for code in ACCESS_DENIED_CODES {
            let err = RemoteError::new("DeleteStack", Some(*code), "msg");
            assert!(err.is_access_denied(), "Expected access denied for code: {code}");
            let hint = err.suggestion().unwrap();
            for permission in REQUIRED_PERMISSIONS {
                assert!(hint.contains(permission));
            }
        }
    }

    #[test]
    fn throttling_codes() {
        for code in THROTTLING_CODES {
            let err = RemoteError::new("BatchDeleteImage", Some(*code), "slow down");
            assert!(err.is_throttled(), "Expected throttled for code: {code}");
            assert!(err.suggestion().is_some());
        }
    }

    #[test]
    fn unknown_and_missing_codes() {
        let err = RemoteError::new("DeleteStack", Some("SomeNewError"), "details");
        assert!(!err.is_not_found());
        assert!(!err.is_access_denied());
        assert!(err.suggestion().is_none());

        let err = RemoteError::new("DeleteStack", None::<String>, "timeout");
        assert!(!err.is_throttled());
        assert!(err.suggestion().is_none());
    }
}
