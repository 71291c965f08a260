//! GitHub App configuration.
//!
//! The app id and private key are read once at startup and turned into an explicit
//! [`AppIdentity`]. Nothing else in the crate reads the process environment.
//!
//! | Variable | Meaning |
//! |---|---|
//! | `GITHUB_APP_ID` | Numeric GitHub App id |
//! | `GITHUB_PRIVATE_KEY` | PEM private key; literal `\n` sequences are allowed |
//! | `GITHUB_PRIVATE_KEY_PATH` | File holding the PEM key, used when `GITHUB_PRIVATE_KEY` is unset |
//! | `GITHUB_INSTALLATION_ACCOUNT` | Account login selecting the installation (default: first installation) |
//! | `GITHUB_API_URL` | REST API root (default: `https://api.github.com`) |
//! | `GITHUB_USER_AGENT` | `User-Agent` header value |
//! | `GITHUB_REQUEST_TIMEOUT_SECS` | Deadline per GitHub request in seconds (default: 10) |

use std::time::Duration;

use github_client::{AppIdentity, ClientSettings};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info};

use crate::{AuthError, AuthResult};

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

/// Environment variable holding the GitHub App id.
pub const APP_ID_VAR: &str = "GITHUB_APP_ID";
/// Environment variable holding the PEM encoded private key.
pub const PRIVATE_KEY_VAR: &str = "GITHUB_PRIVATE_KEY";
/// Environment variable holding the path of the private key file.
pub const PRIVATE_KEY_PATH_VAR: &str = "GITHUB_PRIVATE_KEY_PATH";
/// Environment variable selecting the installation by account login.
pub const INSTALLATION_ACCOUNT_VAR: &str = "GITHUB_INSTALLATION_ACCOUNT";
/// Environment variable overriding the REST API root.
pub const API_URL_VAR: &str = "GITHUB_API_URL";
/// Environment variable overriding the `User-Agent`.
pub const USER_AGENT_VAR: &str = "GITHUB_USER_AGENT";
/// Environment variable overriding the request deadline.
pub const REQUEST_TIMEOUT_VAR: &str = "GITHUB_REQUEST_TIMEOUT_SECS";

/// Raw GitHub App settings as found in configuration.
///
/// Values are kept as given; they are only validated when [`GitHubAppConfig::identity`]
/// is called, so a missing or broken key surfaces as a configuration error before any
/// request is made.
pub struct GitHubAppConfig {
    /// The GitHub App id, unparsed
    pub app_id: Option<String>,
    /// The PEM encoded private key
    pub private_key: Option<SecretString>,
    /// Account login whose installation is used; `None` uses the first installation
    pub installation_account: Option<String>,
    /// Settings for the HTTP client
    pub client: ClientSettings,
}

impl GitHubAppConfig {
    /// Creates a configuration from an app id and private key with default client settings.
    pub fn new(app_id: impl Into<String>, private_key: impl Into<String>) -> Self {
        Self {
            app_id: Some(app_id.into()),
            private_key: Some(SecretString::from(private_key.into())),
            installation_account: None,
            client: ClientSettings::default(),
        }
    }

    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Configuration`] if a value is present but cannot be used,
    /// e.g. an unreadable key file. Missing credentials are reported later by
    /// [`GitHubAppConfig::identity`].
    pub fn from_env() -> AuthResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> AuthResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let private_key = match (value(PRIVATE_KEY_VAR), value(PRIVATE_KEY_PATH_VAR)) {
            (Some(key), _) => Some(key),
            (None, Some(path)) => {
                debug!(path = %path, "Reading GitHub App private key from file");
                let key = std::fs::read_to_string(&path).map_err(|e| {
                    AuthError::Configuration(format!(
                        "cannot read {PRIVATE_KEY_PATH_VAR} '{path}': {e}"
                    ))
                })?;
                Some(key)
            }
            (None, None) => None,
        };

        let mut client = ClientSettings::default();
        if let Some(api_url) = value(API_URL_VAR) {
            client.api_url = api_url;
        }
        if let Some(user_agent) = value(USER_AGENT_VAR) {
            client.user_agent = user_agent;
        }
        if let Some(timeout) = value(REQUEST_TIMEOUT_VAR) {
            let seconds: u64 = timeout.trim().parse().map_err(|_| {
                AuthError::Configuration(format!(
                    "{REQUEST_TIMEOUT_VAR} must be a whole number of seconds, got '{timeout}'"
                ))
            })?;
            if seconds == 0 {
                return Err(AuthError::Configuration(format!(
                    "{REQUEST_TIMEOUT_VAR} must be greater than zero"
                )));
            }
            client.request_timeout = Duration::from_secs(seconds);
        }

        Ok(Self {
            app_id: value(APP_ID_VAR),
            private_key: private_key.map(SecretString::from),
            installation_account: value(INSTALLATION_ACCOUNT_VAR),
            client,
        })
    }

    /// Validates the app id and key and builds the [`AppIdentity`].
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Configuration`] if the app id or key is missing or malformed.
    pub fn identity(&self) -> AuthResult<AppIdentity> {
        let raw_id = self
            .app_id
            .as_deref()
            .ok_or_else(|| AuthError::Configuration(format!("{APP_ID_VAR} is not set")))?;

        let app_id: u64 = raw_id.trim().parse().map_err(|_| {
            AuthError::Configuration(format!("{APP_ID_VAR} must be a positive integer"))
        })?;

        let private_key = self.private_key.as_ref().ok_or_else(|| {
            AuthError::Configuration(format!(
                "neither {PRIVATE_KEY_VAR} nor {PRIVATE_KEY_PATH_VAR} is set"
            ))
        })?;

        let identity = AppIdentity::from_pem(app_id, private_key.expose_secret())?;
        info!(app_id = app_id, "Loaded GitHub App identity");
        Ok(identity)
    }
}

impl std::fmt::Debug for GitHubAppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubAppConfig")
            .field("app_id", &self.app_id)
            .field("private_key", &self.private_key.as_ref().map(|_| "<REDACTED>"))
            .field("installation_account", &self.installation_account)
            .field("client", &self.client)
            .finish()
    }
}
