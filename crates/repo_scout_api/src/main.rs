//! RepoScout REST API Server
//!
//! # Environment Variables
//!
//! - `GITHUB_APP_ID`, `GITHUB_PRIVATE_KEY` or `GITHUB_PRIVATE_KEY_PATH`: GitHub App credentials (required)
//! - `GITHUB_INSTALLATION_ACCOUNT`: Account whose installation to use (default: first installation)
//! - `GITHUB_API_URL`, `GITHUB_USER_AGENT`, `GITHUB_REQUEST_TIMEOUT_SECS`: GitHub client settings
//! - `API_PORT`: Port to listen on (default: 3001)
//! - `API_HOST`: Host to bind to (default: 0.0.0.0)
//! - `RUST_LOG`: Log level (default: info)

use std::sync::Arc;

use auth_handler::{GitHubAppConfig, InstallationTokenBroker};
use repo_scout_api::{ApiConfig, ApiServer, AppState, API_VERSION};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ApiConfig::from_env()?;
    let github_config = GitHubAppConfig::from_env()?;

    let client = github_client::create_client(&github_config.client)?;

    // A missing or malformed key stops startup here rather than on first request
    let broker = InstallationTokenBroker::from_config(&github_config, client)?;
    if let Some(account) = &github_config.installation_account {
        tracing::info!(account = %account, "Selecting installation by account login");
    }

    let state = AppState::new(Arc::new(broker));
    let server = ApiServer::new(config, state);

    tracing::info!("Starting RepoScout API server");
    tracing::info!("API version: {}", API_VERSION);
    tracing::info!(api_url = %github_config.client.api_url, "GitHub API endpoint");

    server.serve().await
}
