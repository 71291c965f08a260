//! Shared helpers for the unit tests of this crate.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use github_client::{
    ApiRequest, ApiResponse, Error, GitHubClient, HttpTransport, InstallationAccessToken,
};
use secrecy::ExposeSecret;

pub(crate) use github_client::test_support::{create_test_identity, create_test_pem, TEST_APP_ID};

/// Mints an installation token the way the broker does, from a scripted GitHub answer.
pub(crate) async fn mint_test_token(
    token: &str,
    expires_at: Option<DateTime<Utc>>,
) -> InstallationAccessToken {
    let mut body = serde_json::json!({ "token": token });
    if let Some(expires_at) = expires_at {
        body["expires_at"] = serde_json::Value::String(expires_at.to_rfc3339());
    }
    let transport = RecordingTransport::new(vec![(
        "POST /app/installations/42/access_tokens",
        201,
        &body.to_string(),
    )]);

    GitHubClient::new(transport)
        .create_installation_token(42, &create_test_identity().assertion().unwrap())
        .await
        .unwrap()
}

/// A request as seen by [`RecordingTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RecordedRequest {
    pub(crate) method: String,
    pub(crate) path: String,
    pub(crate) bearer: String,
}

/// Transport answering from canned responses keyed by `"METHOD /path"`.
///
/// Clones share the same request log, so a test can keep a handle after moving the
/// transport into a client.
#[derive(Debug, Clone, Default)]
pub(crate) struct RecordingTransport {
    responses: Arc<HashMap<String, ApiResponse>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl RecordingTransport {
    pub(crate) fn new(responses: Vec<(&str, u16, &str)>) -> Self {
        Self {
            responses: Arc::new(
                responses
                    .into_iter()
                    .map(|(route, status, body)| (route.to_string(), ApiResponse::new(status, body)))
                    .collect(),
            ),
            requests: Arc::default(),
        }
    }

    pub(crate) fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn paths(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.path).collect()
    }
}

#[async_trait]
impl HttpTransport for RecordingTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, Error> {
        self.requests.lock().unwrap().push(RecordedRequest {
            method: request.method().to_string(),
            path: request.path().to_string(),
            bearer: request.bearer().expose_secret().to_string(),
        });

        let route = format!("{} {}", request.method(), request.path());
        self.responses
            .get(&route)
            .cloned()
            .ok_or_else(|| Error::Transport {
                operation: request.operation(),
                message: format!("no response scripted for {route}"),
            })
    }
}
