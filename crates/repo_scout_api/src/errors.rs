//! Error handling and HTTP error conversion
//!
//! Domain errors are turned into HTTP responses here. Every failure of the
//! installation flow is reported as `500 Internal Server Error` with a short
//! message; raw GitHub response bodies are logged but not returned to the client.

use auth_handler::AuthError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Error body returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// Always `false`
    pub success: bool,

    /// Machine-readable error code
    pub code: String,

    /// Human-readable error message
    pub error: String,
}

/// Axum response wrapper for API errors
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(State(state): State<AppState>) -> Result<Json<Response>, ApiError> {
///     let repositories = state.repositories.list_accessible_repositories().await?;
///     Ok(Json(repositories.into()))
/// }
/// ```
pub struct ApiError(anyhow::Error);

impl ApiError {
    /// Create a new API error from any error type
    pub fn new(err: impl Into<anyhow::Error>) -> Self {
        ApiError(err.into())
    }
}

impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        ApiError(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_response) = convert_error(&self.0);

        // Log error server-side
        log_error(&self.0, status);

        (status, Json(error_response)).into_response()
    }
}

/// Convert domain error to HTTP status code and error response
fn convert_error(error: &anyhow::Error) -> (StatusCode, ErrorResponse) {
    let (code, message) = match error.downcast_ref::<AuthError>() {
        Some(auth_error) => convert_auth_error(auth_error),
        None => ("InternalError", "An internal error occurred".to_string()),
    };

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        ErrorResponse {
            success: false,
            code: code.to_string(),
            error: message,
        },
    )
}

fn convert_auth_error(error: &AuthError) -> (&'static str, String) {
    use github_client::Error as GitHubError;

    match error {
        AuthError::Configuration(_) => (
            "ConfigurationError",
            "The GitHub App is not configured correctly".to_string(),
        ),
        AuthError::GitHub(GitHubError::Upstream {
            operation, status, ..
        }) => (
            "UpstreamError",
            format!("GitHub API request '{operation}' failed with status {status}"),
        ),
        AuthError::GitHub(GitHubError::Timeout { operation, .. }) => (
            "TimeoutError",
            format!("GitHub API request '{operation}' timed out"),
        ),
        AuthError::GitHub(GitHubError::Protocol { .. }) => {
            ("ProtocolError", error.to_string())
        }
        AuthError::GitHub(other) => ("TransportError", other.to_string()),
    }
}

/// Log error with full detail; the response only carries the summary
fn log_error(error: &anyhow::Error, status: StatusCode) {
    tracing::error!(status = %status, error = %error, "API error");
}
