//! Timeout utilities for page operations
//!
//! Every suspending browser call goes through here so that expiry surfaces as
//! a typed [`SessionError::Timeout`] instead of an indefinite hang.

use std::future::Future;
use std::time::Duration;

use super::SessionError;

/// Run a session operation with an explicit deadline
///
/// # Arguments
/// * `operation` - The future to drive
/// * `timeout` - Deadline for the whole operation
/// * `operation_name` - Human-readable name used in the timeout error
pub async fn with_page_timeout<F, T>(
    operation: F,
    timeout: Duration,
    operation_name: &str,
) -> Result<T, SessionError>
where
    F: Future<Output = Result<T, SessionError>>,
{
    match tokio::time::timeout(timeout, operation).await {
        Ok(result) => result,
        Err(_) => Err(SessionError::Timeout {
            operation: operation_name.to_string(),
            elapsed_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        }),
    }
}
