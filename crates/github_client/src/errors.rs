//! Error types for GitHub client operations.
//!
//! Every failure of the installation flow maps onto one variant of [`Error`]. The
//! variants separate problems the caller can fix by changing configuration from
//! problems reported by GitHub and from problems with the network itself, so that a
//! caller can decide whether trying again makes any sense.

use std::time::Duration;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that can occur during GitHub client operations.
///
/// ## Examples
///
/// ```rust
/// use github_client::Error;
///
/// fn describe(err: &Error) -> &'static str {
///     match err {
///         Error::Configuration(_) => "fix the app credentials",
///         Error::Upstream { status: 401, .. } => "GitHub rejected the credentials",
///         Error::Upstream { .. } => "GitHub returned an error",
///         Error::Protocol { .. } => "GitHub returned something unexpected",
///         Error::Timeout { .. } => "GitHub did not answer in time",
///         Error::Transport { .. } => "GitHub could not be reached",
///     }
/// }
///
/// let err = Error::Upstream {
///     operation: "list_installations",
///     status: 401,
///     body: "Bad credentials".to_string(),
/// };
/// assert_eq!(describe(&err), "GitHub rejected the credentials");
/// ```
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The GitHub App identity is missing or malformed.
    ///
    /// This error is raised before any request is sent. It is never retryable: the
    /// app id or the private key has to be fixed first. The message never contains
    /// key material.
    #[error("GitHub App configuration is invalid: {0}")]
    Configuration(String),

    /// GitHub answered with a non-success status code.
    ///
    /// The original status and raw response body are kept for diagnostics.
    #[error("GitHub API request '{operation}' failed with status {status}: {body}")]
    Upstream {
        /// The client operation that issued the request
        operation: &'static str,
        /// The HTTP status code returned by GitHub
        status: u16,
        /// The raw response body
        body: String,
    },

    /// GitHub answered with a success status but the body did not have the expected shape.
    #[error("Unexpected response from GitHub for '{operation}': {reason}")]
    Protocol {
        /// The client operation that issued the request
        operation: &'static str,
        /// What was wrong with the response
        reason: String,
    },

    /// The request did not complete within the configured deadline.
    #[error("GitHub API request '{operation}' timed out after {timeout:?}")]
    Timeout {
        /// The client operation that issued the request
        operation: &'static str,
        /// The deadline that was exceeded
        timeout: Duration,
    },

    /// The request could not be delivered, e.g. because the connection was refused.
    #[error("GitHub API request '{operation}' could not be sent: {message}")]
    Transport {
        /// The client operation that issued the request
        operation: &'static str,
        /// A description of the transport failure
        message: String,
    },
}

impl Error {
    /// Returns the HTTP status code for [`Error::Upstream`] errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Indicates whether repeating the failed request could succeed.
    ///
    /// Configuration and protocol errors are permanent. Timeouts, transport failures,
    /// rate limiting and server side errors are transient. Client errors other than
    /// rate limiting are treated as permanent.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Configuration(_) | Error::Protocol { .. } => false,
            Error::Timeout { .. } | Error::Transport { .. } => true,
            Error::Upstream { status, .. } => *status == 403 || *status == 429 || *status >= 500,
        }
    }
}
