//! Conversion of AWS SDK errors into `RemoteError`
//!
//! Uses `ProvideErrorMetadata` to pull the service error code out of any
//! SDK operation error instead of string matching on the Debug format.

use aws_sdk_cloudformation::error::{DisplayErrorContext, ProvideErrorMetadata};
use cfn_purge_common::RemoteError;

/// Build a `RemoteError` for `operation` from an SDK error.
///
/// Falls back to the full error context when the service sent no message
/// (timeouts, dispatch failures, credential errors).
pub fn remote_error<E>(operation: &'static str, err: E) -> RemoteError
where
    E: ProvideErrorMetadata + std::error::Error,
{
    let code = err.code().map(str::to_string);
    let message = match err.message() {
        Some(message) => message.to_string(),
        None => DisplayErrorContext(err).to_string(),
    };

    RemoteError {
        operation,
        code,
        message,
    }
}
