//! GitHub App installation authentication for RepoScout.
//!
//! This crate turns GitHub App credentials into the list of repositories the app's
//! installation can access:
//!
//! 1. [`GitHubAppConfig`] is validated into an [`AppIdentity`](github_client::AppIdentity)
//! 2. [`InstallationTokenBroker`] signs an app assertion, discovers the installations,
//!    mints an installation access token and lists the installation's repositories
//!
//! Callers depend on the [`AccessibleRepositories`] trait rather than on the broker.

use async_trait::async_trait;
use github_client::{GitHubClient, HttpTransport};

mod broker;
pub mod config;
pub mod selection;
pub mod token_cache;

pub use broker::InstallationTokenBroker;
pub use config::GitHubAppConfig;
pub use selection::{AccountLoginSelector, FirstInstallation, InstallationSelector};
pub use token_cache::{InMemoryTokenCache, InstallationTokenCache, NoTokenCache};

#[cfg(test)]
mod test_support;

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

/// Result type for authentication operations
pub type AuthResult<T> = std::result::Result<T, AuthError>;

/// Errors that can occur while listing the repositories of an installation
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The GitHub App id or private key is missing or malformed.
    #[error("GitHub App configuration is invalid: {0}")]
    Configuration(String),

    /// A GitHub request failed.
    #[error(transparent)]
    GitHub(github_client::Error),
}

impl AuthError {
    /// The HTTP status GitHub answered with, for upstream errors.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            AuthError::GitHub(e) => e.status(),
            AuthError::Configuration(_) => None,
        }
    }
}

impl From<github_client::Error> for AuthError {
    fn from(error: github_client::Error) -> Self {
        match error {
            github_client::Error::Configuration(message) => AuthError::Configuration(message),
            other => AuthError::GitHub(other),
        }
    }
}

/// Lists the repositories the GitHub App can access.
///
/// This is the operation exposed to HTTP handlers and other callers.
#[async_trait]
pub trait AccessibleRepositories: Send + Sync {
    /// Returns the full names (`owner/repo`) of the accessible repositories.
    ///
    /// # Errors
    ///
    /// Returns an [`AuthError`] if the configuration is invalid or any GitHub call fails.
    /// No partial list is ever returned.
    async fn list_accessible_repositories(&self) -> AuthResult<Vec<String>>;
}

/// Validates `config` and runs the broker once.
///
/// The identity is checked before `client` sends anything, so invalid credentials never
/// cause a request.
pub async fn list_accessible_repositories<T: HttpTransport>(
    config: &GitHubAppConfig,
    client: GitHubClient<T>,
) -> AuthResult<Vec<String>> {
    let broker = InstallationTokenBroker::from_config(config, client)?;
    broker.list_accessible_repositories().await
}
