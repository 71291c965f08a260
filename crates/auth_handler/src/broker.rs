//! The installation token broker.
//!
//! One broker call is four strictly sequential steps, each needing the previous result:
//!
//! 1. sign an app assertion
//! 2. list the app's installations with the assertion
//! 3. mint an access token for the selected installation with the assertion
//! 4. list the installation's repositories with the access token
//!
//! Any failing step ends the call with an error. The broker keeps no state between
//! calls unless a token cache is configured.

use async_trait::async_trait;
use github_client::{
    AppAssertionToken, AppIdentity, GitHubClient, HttpTransport, InstallationAccessToken,
    ReqwestTransport,
};
use tracing::{debug, info, instrument, warn};

use crate::selection::{AccountLoginSelector, FirstInstallation, InstallationSelector};
use crate::token_cache::{InstallationTokenCache, NoTokenCache};
use crate::{AccessibleRepositories, AuthResult, GitHubAppConfig};

/// Exchanges GitHub App credentials for the repositories of one installation.
///
/// # Examples
///
/// ```rust,no_run
/// use auth_handler::{GitHubAppConfig, InstallationTokenBroker};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = GitHubAppConfig::from_env()?;
/// let client = github_client::create_client(&config.client)?;
/// let broker = InstallationTokenBroker::from_config(&config, client)?;
///
/// for repository in broker.list_accessible_repositories().await? {
///     println!("{repository}");
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct InstallationTokenBroker<T = ReqwestTransport> {
    identity: AppIdentity,
    client: GitHubClient<T>,
    selector: Box<dyn InstallationSelector>,
    token_cache: Box<dyn InstallationTokenCache>,
}

impl<T: HttpTransport> InstallationTokenBroker<T> {
    /// Creates a broker using the first installation and minting a token on every call.
    pub fn new(identity: AppIdentity, client: GitHubClient<T>) -> Self {
        Self {
            identity,
            client,
            selector: Box::new(FirstInstallation),
            token_cache: Box::new(NoTokenCache),
        }
    }

    /// Creates a broker from raw configuration.
    ///
    /// Selects installations by account login when the configuration names one.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Configuration`](crate::AuthError::Configuration) if the app
    /// id or key is missing or malformed.
    pub fn from_config(config: &GitHubAppConfig, client: GitHubClient<T>) -> AuthResult<Self> {
        let broker = Self::new(config.identity()?, client);
        Ok(match &config.installation_account {
            Some(login) => broker.with_selector(AccountLoginSelector::new(login)),
            None => broker,
        })
    }

    /// Replaces the installation selection policy.
    pub fn with_selector(mut self, selector: impl InstallationSelector + 'static) -> Self {
        self.selector = Box::new(selector);
        self
    }

    /// Replaces the installation token cache.
    pub fn with_token_cache(mut self, token_cache: impl InstallationTokenCache + 'static) -> Self {
        self.token_cache = Box::new(token_cache);
        self
    }

    /// Returns the full names of the repositories the selected installation can access.
    ///
    /// An app without installations, or without an installation the selector accepts,
    /// has no accessible repositories; no token is minted in that case.
    ///
    /// # Errors
    ///
    /// Returns the error of the first step that fails.
    #[instrument(skip(self), fields(app_id = self.identity.app_id()))]
    pub async fn list_accessible_repositories(&self) -> AuthResult<Vec<String>> {
        let assertion = self.identity.assertion()?;

        let installations = self.client.list_installations(&assertion).await?;
        if installations.is_empty() {
            info!("GitHub App has no installations");
            return Ok(Vec::new());
        }

        let Some(installation) = self.selector.select(&installations) else {
            warn!(
                installation_count = installations.len(),
                selector = ?self.selector,
                "No installation matches the selection policy"
            );
            return Ok(Vec::new());
        };

        info!(
            installation_id = installation.id,
            account = installation.account_login().unwrap_or("<unknown>"),
            installation_count = installations.len(),
            "Selected installation"
        );

        let token = self.installation_token(installation.id, &assertion).await?;
        let repositories = self.client.list_installation_repositories(&token).await?;

        Ok(repositories
            .into_iter()
            .map(|repository| repository.full_name)
            .collect())
    }

    async fn installation_token(
        &self,
        installation_id: u64,
        assertion: &AppAssertionToken,
    ) -> AuthResult<InstallationAccessToken> {
        if let Some(token) = self.token_cache.get(installation_id).await {
            debug!(installation_id = installation_id, "Using cached installation token");
            return Ok(token);
        }

        let token = self
            .client
            .create_installation_token(installation_id, assertion)
            .await?;
        self.token_cache.store(installation_id, &token).await;
        Ok(token)
    }
}

#[async_trait]
impl<T: HttpTransport> AccessibleRepositories for InstallationTokenBroker<T> {
    async fn list_accessible_repositories(&self) -> AuthResult<Vec<String>> {
        InstallationTokenBroker::list_accessible_repositories(self).await
    }
}
