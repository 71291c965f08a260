//! HTTP transport for GitHub REST calls.
//!
//! [`GitHubClient`](crate::GitHubClient) never talks to the network directly. It hands an
//! [`ApiRequest`] to an [`HttpTransport`] and interprets the returned [`ApiResponse`].
//! Production code uses [`ReqwestTransport`]; tests substitute an in-memory transport.

use async_trait::async_trait;
use http::Method;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;
use url::Url;

use crate::Error;

#[cfg(test)]
#[path = "transport_tests.rs"]
mod tests;

/// Default GitHub REST API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Media type GitHub expects in the `Accept` header.
pub const GITHUB_MEDIA_TYPE: &str = "application/vnd.github+json";

/// REST API version sent with every request.
pub const GITHUB_API_VERSION: &str = "2022-11-28";

/// A single authenticated request to the GitHub REST API.
#[derive(Debug)]
pub struct ApiRequest {
    operation: &'static str,
    method: Method,
    path: String,
    bearer: SecretString,
}

impl ApiRequest {
    pub(crate) fn new(
        operation: &'static str,
        method: Method,
        path: impl Into<String>,
        bearer: &SecretString,
    ) -> Self {
        Self {
            operation,
            method,
            path: path.into(),
            bearer: SecretString::from(bearer.expose_secret().to_owned()),
        }
    }

    /// Name of the client operation issuing the request, used in errors and logs.
    pub fn operation(&self) -> &'static str {
        self.operation
    }

    /// HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Path relative to the API root, starting with `/`.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The credential sent as `Authorization: Bearer <value>`.
    pub fn bearer(&self) -> &SecretString {
        &self.bearer
    }
}

/// Status and raw body of a GitHub response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    status: u16,
    body: String,
}

impl ApiResponse {
    /// Creates a response from a status code and body.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// HTTP status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Raw response body.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Whether the status code is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends requests to the GitHub REST API.
///
/// Implementations only deliver the request and report what came back; status
/// interpretation, deadlines and retries belong to the client.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Sends the request and returns the response, whatever its status code.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] if no response was received.
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, Error>;
}

/// [`HttpTransport`] backed by a `reqwest` client.
///
/// Every request carries the GitHub media type in `Accept`, the REST API version
/// header and the configured `User-Agent`; GitHub rejects requests without one.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: String,
}

impl ReqwestTransport {
    /// Creates a transport for the API rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the URL or user agent is invalid or the HTTP
    /// client cannot be built.
    pub fn new(base_url: &str, user_agent: &str) -> Result<Self, Error> {
        let parsed = Url::parse(base_url).map_err(|e| {
            Error::Configuration(format!("invalid GitHub API URL '{base_url}': {e}"))
        })?;

        if user_agent.trim().is_empty() {
            return Err(Error::Configuration(
                "a User-Agent is required by the GitHub API".to_string(),
            ));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_MEDIA_TYPE));
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static(GITHUB_API_VERSION),
        );

        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .default_headers(headers)
            .build()
            .map_err(|e| Error::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
        })
    }

    /// The API root requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, Error> {
        let url = format!("{}{}", self.base_url, request.path());
        debug!(operation = request.operation(), method = %request.method(), url = %url, "Sending GitHub API request");

        let response = self
            .client
            .request(request.method().clone(), &url)
            .bearer_auth(request.bearer().expose_secret())
            .send()
            .await
            .map_err(|e| Error::Transport {
                operation: request.operation(),
                message: e.to_string(),
            })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| Error::Transport {
            operation: request.operation(),
            message: format!("failed to read response body: {e}"),
        })?;

        Ok(ApiResponse::new(status, body))
    }
}
