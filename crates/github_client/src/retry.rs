//! Retry decisions for failed GitHub requests.

use std::time::Duration;

use crate::Error;

/// Decides whether a failed request is sent again.
///
/// The client asks the policy after every failed attempt. Returning `Some(delay)`
/// repeats the request after `delay`; returning `None` gives up with the error.
pub trait RetryPolicy: Send + Sync + std::fmt::Debug {
    /// Called after attempt number `attempt` (starting at 1) failed with `error`.
    fn retry_after(&self, attempt: u32, error: &Error) -> Option<Duration>;
}

/// Sends every request exactly once.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRetry;

impl RetryPolicy for NoRetry {
    fn retry_after(&self, _attempt: u32, _error: &Error) -> Option<Duration> {
        None
    }
}
