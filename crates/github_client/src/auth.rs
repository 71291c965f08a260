//! GitHub App credentials.
//!
//! GitHub Apps authenticate with two different kinds of bearer credential:
//!
//! 1. **App assertion** ([`AppAssertionToken`]): a short-lived JWT signed with the app's
//!    private key. It is accepted only by the app-level endpoints (`/app/...`).
//! 2. **Installation access token** ([`InstallationAccessToken`]): a token minted for one
//!    installation. It is accepted only by installation-scoped endpoints.
//!
//! The two are separate types so that the client signatures decide which credential an
//! endpoint receives. Neither type prints its secret through `Debug`.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::Error;

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;

/// Lifetime of an app assertion in seconds. GitHub rejects assertions valid for longer.
pub const ASSERTION_LIFETIME_SECS: i64 = 600;

/// JWT claims GitHub expects in an app assertion.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct AssertionClaims {
    /// Issued at (Unix timestamp)
    pub(crate) iat: i64,
    /// Expiration (Unix timestamp)
    pub(crate) exp: i64,
    /// The GitHub App id
    pub(crate) iss: u64,
}

/// The identity of a GitHub App: its numeric id and RSA signing key.
///
/// An `AppIdentity` is only ever created from a key that has been parsed and proven
/// able to sign, so signing an assertion later cannot fail because of the key.
///
/// # Examples
///
/// ```rust,no_run
/// use github_client::AppIdentity;
///
/// # fn example() -> Result<(), github_client::Error> {
/// let pem = std::fs::read_to_string("app-key.pem").unwrap_or_default();
/// let identity = AppIdentity::from_pem(12345, &pem)?;
/// let assertion = identity.assertion()?;
/// println!("assertion expires at {}", assertion.expires_at());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct AppIdentity {
    app_id: u64,
    signing_key: EncodingKey,
}

impl AppIdentity {
    /// Creates an identity from an app id and a PEM encoded RSA private key.
    ///
    /// Literal `\n` sequences in the key are turned into real line breaks first, which
    /// is how keys usually arrive from single-line environment values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the app id is zero, the key is empty, or the
    /// key is not a usable RSA private key.
    pub fn from_pem(app_id: u64, private_key_pem: &str) -> Result<Self, Error> {
        if app_id == 0 {
            return Err(Error::Configuration(
                "the GitHub App id must be a positive integer".to_string(),
            ));
        }

        let pem = normalize_private_key(private_key_pem);
        if pem.is_empty() {
            return Err(Error::Configuration(
                "the GitHub App private key is empty".to_string(),
            ));
        }

        let signing_key = EncodingKey::from_rsa_pem(pem.as_bytes()).map_err(|e| {
            error!(app_id = app_id, error = %e, "Failed to parse GitHub App private key");
            Error::Configuration(format!(
                "the GitHub App private key is not a valid RSA PEM key: {e}"
            ))
        })?;

        let identity = Self {
            app_id,
            signing_key,
        };

        // The PEM parser does not look inside the key; a test signature does.
        identity.assertion_at(Utc::now())?;
        debug!(app_id = app_id, "GitHub App private key loaded");

        Ok(identity)
    }

    /// The numeric GitHub App id.
    pub fn app_id(&self) -> u64 {
        self.app_id
    }

    /// Signs a new assertion issued now.
    pub fn assertion(&self) -> Result<AppAssertionToken, Error> {
        self.assertion_at(Utc::now())
    }

    /// Signs a new assertion with the given issue time.
    ///
    /// The assertion expires exactly [`ASSERTION_LIFETIME_SECS`] after `issued_at`.
    pub fn assertion_at(&self, issued_at: DateTime<Utc>) -> Result<AppAssertionToken, Error> {
        let expires_at = issued_at + Duration::seconds(ASSERTION_LIFETIME_SECS);
        let claims = AssertionClaims {
            iat: issued_at.timestamp(),
            exp: issued_at.timestamp() + ASSERTION_LIFETIME_SECS,
            iss: self.app_id,
        };

        let jwt = encode(&Header::new(Algorithm::RS256), &claims, &self.signing_key).map_err(
            |e| {
                error!(app_id = self.app_id, error = %e, "Failed to sign GitHub App assertion");
                Error::Configuration(format!(
                    "the GitHub App private key cannot sign assertions: {e}"
                ))
            },
        )?;

        Ok(AppAssertionToken {
            jwt: SecretString::from(jwt),
            issued_at,
            expires_at,
        })
    }
}

impl std::fmt::Debug for AppIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppIdentity")
            .field("app_id", &self.app_id)
            .field("signing_key", &"<REDACTED>")
            .finish()
    }
}

/// Cleans up a private key read from configuration.
///
/// Strips surrounding whitespace and quotes and replaces literal `\n` sequences with
/// line breaks.
pub fn normalize_private_key(raw: &str) -> String {
    raw.trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .replace("\\r\\n", "\n")
        .replace("\\n", "\n")
        .trim()
        .to_string()
}

/// A signed JWT proving the identity of a GitHub App.
///
/// Only accepted by app-level endpoints such as `/app/installations`.
pub struct AppAssertionToken {
    jwt: SecretString,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl AppAssertionToken {
    /// When the assertion was issued.
    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    /// When GitHub stops accepting the assertion.
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub(crate) fn bearer(&self) -> &SecretString {
        &self.jwt
    }
}

impl std::fmt::Debug for AppAssertionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppAssertionToken")
            .field("jwt", &"<REDACTED>")
            .field("issued_at", &self.issued_at)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// A token granting access to the repositories of one installation.
///
/// Only accepted by installation-scoped endpoints such as `/installation/repositories`.
/// Tokens come from [`GitHubClient::create_installation_token`](crate::GitHubClient::create_installation_token);
/// other crates cannot wrap an arbitrary string:
///
/// ```compile_fail
/// let token = github_client::InstallationAccessToken::new("ghs_forged", None);
/// ```
pub struct InstallationAccessToken {
    token: SecretString,
    expires_at: Option<DateTime<Utc>>,
}

impl InstallationAccessToken {
    /// Wraps a token value and the expiry reported by GitHub.
    pub(crate) fn new(token: impl Into<String>, expires_at: Option<DateTime<Utc>>) -> Self {
        Self {
            token: SecretString::from(token.into()),
            expires_at,
        }
    }

    /// When GitHub stops accepting the token, if GitHub reported it.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Whether the token is still valid at `now` with at least `margin` to spare.
    ///
    /// A token without a known expiry is never considered usable.
    pub fn is_usable_at(&self, now: DateTime<Utc>, margin: Duration) -> bool {
        self.expires_at
            .map(|expires_at| expires_at - margin > now)
            .unwrap_or(false)
    }

    pub(crate) fn bearer(&self) -> &SecretString {
        &self.token
    }
}

impl Clone for InstallationAccessToken {
    fn clone(&self) -> Self {
        Self::new(self.token.expose_secret(), self.expires_at)
    }
}

impl std::fmt::Debug for InstallationAccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstallationAccessToken")
            .field("token", &"<REDACTED>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
