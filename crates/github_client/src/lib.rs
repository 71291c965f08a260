//! Crate for talking to the GitHub REST API as a GitHub App.
//!
//! The crate covers the three calls of the installation flow:
//!
//! 1. [`GitHubClient::list_installations`] with an [`AppAssertionToken`]
//! 2. [`GitHubClient::create_installation_token`] with an [`AppAssertionToken`]
//! 3. [`GitHubClient::list_installation_repositories`] with an [`InstallationAccessToken`]
//!
//! Requests go through an [`HttpTransport`], so the network can be replaced in tests.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use http::Method;
use secrecy::SecretString;
use serde::Deserialize;
use tracing::{error, info, instrument, warn};

pub mod auth;
pub mod errors;
pub mod installation;
mod listing;
pub mod repository;
pub mod retry;
pub mod transport;

pub use auth::{AppAssertionToken, AppIdentity, InstallationAccessToken};
pub use errors::Error;
pub use installation::{Account, Installation};
pub use repository::RepositoryRef;
pub use retry::{NoRetry, RetryPolicy};
pub use transport::{ApiRequest, ApiResponse, HttpTransport, ReqwestTransport};

use listing::decode_listing;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_support;

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

/// Default deadline for a single GitHub request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Default `User-Agent` sent to GitHub.
pub const DEFAULT_USER_AGENT: &str = concat!("repo-scout/", env!("CARGO_PKG_VERSION"));

/// Settings for building a [`GitHubClient`] with [`create_client`].
#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// Root of the GitHub REST API
    pub api_url: String,
    /// Value of the `User-Agent` header
    pub user_agent: String,
    /// Deadline for each individual request
    pub request_timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_url: transport::DEFAULT_API_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// Body of a successful `POST /app/installations/{id}/access_tokens`.
#[derive(Debug, Deserialize)]
struct AccessTokenResponse {
    token: Option<String>,
    expires_at: Option<DateTime<Utc>>,
}

/// A client for the GitHub REST API calls of the GitHub App installation flow.
///
/// The client holds no credentials. Each call takes the credential its endpoint
/// accepts, so an assertion cannot reach an installation endpoint and vice versa.
#[derive(Debug)]
pub struct GitHubClient<T = ReqwestTransport> {
    transport: T,
    request_timeout: Duration,
    retry_policy: Arc<dyn RetryPolicy>,
}

impl<T: HttpTransport> GitHubClient<T> {
    /// Creates a client sending requests through `transport`.
    ///
    /// Requests time out after [`DEFAULT_REQUEST_TIMEOUT`] and are not retried.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            retry_policy: Arc::new(NoRetry),
        }
    }

    /// Sets the deadline for each individual request.
    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    /// Sets the policy deciding whether failed requests are repeated.
    pub fn with_retry_policy(mut self, retry_policy: impl RetryPolicy + 'static) -> Self {
        self.retry_policy = Arc::new(retry_policy);
        self
    }

    /// The transport requests are sent through.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Lists the installations of the GitHub App, in response order.
    ///
    /// Accepts both a bare array and an object with an `installations` key. An empty
    /// list is a valid result.
    ///
    /// # Errors
    ///
    /// - [`Error::Upstream`] if GitHub answers with a non-success status
    /// - [`Error::Protocol`] if the body cannot be decoded
    /// - [`Error::Timeout`] or [`Error::Transport`] if no answer arrives
    #[instrument(skip(self, assertion))]
    pub async fn list_installations(
        &self,
        assertion: &AppAssertionToken,
    ) -> Result<Vec<Installation>, Error> {
        const OPERATION: &str = "list_installations";

        let response = self
            .execute(
                OPERATION,
                Method::GET,
                "/app/installations".to_string(),
                assertion.bearer(),
            )
            .await?;

        let listing = decode_listing::<Installation>(OPERATION, response.body(), "installations")?;

        info!(
            count = listing.items.len(),
            "Retrieved installations for GitHub App"
        );

        Ok(listing.items)
    }

    /// Mints an access token for the installation with the given id.
    ///
    /// # Errors
    ///
    /// - [`Error::Upstream`] if GitHub answers with a non-success status
    /// - [`Error::Protocol`] if the body has no `token`
    /// - [`Error::Timeout`] or [`Error::Transport`] if no answer arrives
    #[instrument(skip(self, assertion))]
    pub async fn create_installation_token(
        &self,
        installation_id: u64,
        assertion: &AppAssertionToken,
    ) -> Result<InstallationAccessToken, Error> {
        const OPERATION: &str = "create_installation_token";

        let response = self
            .execute(
                OPERATION,
                Method::POST,
                format!("/app/installations/{installation_id}/access_tokens"),
                assertion.bearer(),
            )
            .await?;

        let payload: AccessTokenResponse =
            serde_json::from_str(response.body()).map_err(|e| Error::Protocol {
                operation: OPERATION,
                reason: format!("access token response could not be decoded: {e}"),
            })?;

        let token = payload
            .token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                error!(
                    installation_id = installation_id,
                    "Access token response does not contain a token"
                );
                Error::Protocol {
                    operation: OPERATION,
                    reason: "response does not contain a 'token' field".to_string(),
                }
            })?;

        info!(
            installation_id = installation_id,
            expires_at = ?payload.expires_at,
            "Minted installation access token"
        );

        Ok(InstallationAccessToken::new(token, payload.expires_at))
    }

    /// Lists the full names of the repositories the installation can access.
    ///
    /// Only the first page is read. When GitHub reports more repositories than the
    /// page holds, a warning is logged.
    ///
    /// # Errors
    ///
    /// - [`Error::Upstream`] if GitHub answers with a non-success status
    /// - [`Error::Protocol`] if the body cannot be decoded
    /// - [`Error::Timeout`] or [`Error::Transport`] if no answer arrives
    #[instrument(skip(self, token))]
    pub async fn list_installation_repositories(
        &self,
        token: &InstallationAccessToken,
    ) -> Result<Vec<RepositoryRef>, Error> {
        const OPERATION: &str = "list_installation_repositories";

        let response = self
            .execute(
                OPERATION,
                Method::GET,
                "/installation/repositories".to_string(),
                token.bearer(),
            )
            .await?;

        let listing = decode_listing::<RepositoryRef>(OPERATION, response.body(), "repositories")?;

        if let Some(total_count) = listing.total_count {
            if total_count > listing.items.len() as u64 {
                warn!(
                    returned = listing.items.len(),
                    total_count = total_count,
                    "Installation has more repositories than the first page holds; the rest are not listed"
                );
            }
        }

        info!(
            count = listing.items.len(),
            "Retrieved repositories for installation"
        );

        Ok(listing.items)
    }

    async fn execute(
        &self,
        operation: &'static str,
        method: Method,
        path: String,
        bearer: &SecretString,
    ) -> Result<ApiResponse, Error> {
        let mut attempt = 1;
        loop {
            let request = ApiRequest::new(operation, method.clone(), path.clone(), bearer);
            let result = match tokio::time::timeout(
                self.request_timeout,
                self.transport.send(request),
            )
            .await
            {
                Ok(result) => result,
                Err(_) => Err(Error::Timeout {
                    operation,
                    timeout: self.request_timeout,
                }),
            };

            let error = match result {
                Ok(response) if response.is_success() => return Ok(response),
                Ok(response) => Error::Upstream {
                    operation,
                    status: response.status(),
                    body: response.body().to_string(),
                },
                Err(error) => error,
            };

            match self.retry_policy.retry_after(attempt, &error) {
                Some(delay) => {
                    warn!(
                        operation = operation,
                        attempt = attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %error,
                        "GitHub API request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                None => {
                    log_request_error(&error);
                    return Err(error);
                }
            }
        }
    }
}

/// Creates a client that talks to GitHub over HTTPS.
///
/// # Errors
///
/// Returns [`Error::Configuration`] if the settings are invalid.
///
/// # Example
///
/// ```rust,no_run
/// use github_client::{create_client, AppIdentity, ClientSettings, Error};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Error> {
///     let pem = std::fs::read_to_string("app-key.pem").unwrap_or_default();
///     let identity = AppIdentity::from_pem(123456, &pem)?;
///     let client = create_client(&ClientSettings::default())?;
///
///     let installations = client.list_installations(&identity.assertion()?).await?;
///     println!("{} installations", installations.len());
///     Ok(())
/// }
/// ```
pub fn create_client(settings: &ClientSettings) -> Result<GitHubClient<ReqwestTransport>, Error> {
    let transport = ReqwestTransport::new(&settings.api_url, &settings.user_agent)?;
    Ok(GitHubClient::new(transport).with_request_timeout(settings.request_timeout))
}

fn log_request_error(error: &Error) {
    match error {
        Error::Upstream {
            operation,
            status,
            body,
        } => {
            error!(
                operation = operation,
                status = status,
                body = %body,
                "GitHub API returned an error status"
            );
        }
        Error::Timeout { operation, timeout } => {
            error!(operation = operation, timeout = ?timeout, "GitHub API request timed out");
        }
        other => {
            error!(error = %other, "GitHub API request failed");
        }
    }
}
