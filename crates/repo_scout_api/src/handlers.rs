//! HTTP request handlers
//!
//! Handlers translate HTTP requests into calls on the application state and
//! the results back into JSON responses.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::{errors::ApiError, AppState};

#[cfg(test)]
#[path = "handlers_tests.rs"]
mod tests;

/// Repositories the GitHub App installation can access
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoriesResponse {
    /// Always `true`
    pub success: bool,

    /// Repository full names (`owner/repo`), in GitHub's order
    pub result: Vec<String>,
}

/// List the repositories the GitHub App can access
///
/// GET /api/v1/github/repositories
pub async fn list_github_repositories(
    State(state): State<AppState>,
) -> Result<Json<RepositoriesResponse>, ApiError> {
    let repositories = state.repositories.list_accessible_repositories().await?;

    tracing::info!(count = repositories.len(), "Listed accessible repositories");

    Ok(Json(RepositoriesResponse {
        success: true,
        result: repositories,
    }))
}

/// Health check endpoint
///
/// GET /api/v1/health
pub async fn health_check() -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        status: "healthy".to_string(),
        version: Some(env!("CARGO_PKG_VERSION").to_string()),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheckResponse {
    /// Service status
    pub status: String,

    /// Service version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Current timestamp (ISO 8601)
    pub timestamp: String,
}
