//! Tests for error handling and HTTP conversion

use super::*;
use std::time::Duration;

fn convert(error: AuthError) -> (StatusCode, ErrorResponse) {
    convert_error(&anyhow::Error::new(error))
}

#[test]
fn test_configuration_error_hides_details() {
    let (status, response) = convert(AuthError::Configuration(
        "the GitHub App private key is not a valid RSA PEM key".to_string(),
    ));

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!response.success);
    assert_eq!(response.code, "ConfigurationError");
    assert_eq!(response.error, "The GitHub App is not configured correctly");
}

#[test]
fn test_upstream_error_keeps_status_but_not_body() {
    let (status, response) = convert(AuthError::GitHub(github_client::Error::Upstream {
        operation: "list_installations",
        status: 401,
        body: r#"{"message":"Bad credentials"}"#.to_string(),
    }));

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.code, "UpstreamError");
    assert_eq!(
        response.error,
        "GitHub API request 'list_installations' failed with status 401"
    );
}

#[test]
fn test_timeout_error() {
    let (_, response) = convert(AuthError::GitHub(github_client::Error::Timeout {
        operation: "create_installation_token",
        timeout: Duration::from_secs(10),
    }));

    assert_eq!(response.code, "TimeoutError");
    assert_eq!(
        response.error,
        "GitHub API request 'create_installation_token' timed out"
    );
}

#[test]
fn test_protocol_error() {
    let (_, response) = convert(AuthError::GitHub(github_client::Error::Protocol {
        operation: "create_installation_token",
        reason: "response does not contain a 'token' field".to_string(),
    }));

    assert_eq!(response.code, "ProtocolError");
    assert!(response.error.contains("'token'"));
}

#[test]
fn test_unknown_error_is_generic() {
    let (status, response) = convert_error(&anyhow::anyhow!("database on fire"));

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.code, "InternalError");
    assert_eq!(response.error, "An internal error occurred");
}

#[test]
fn test_error_response_serialization() {
    let response = ErrorResponse {
        success: false,
        code: "UpstreamError".to_string(),
        error: "failed".to_string(),
    };

    let json = serde_json::to_value(&response).unwrap();

    assert_eq!(
        json,
        serde_json::json!({ "success": false, "code": "UpstreamError", "error": "failed" })
    );
}
