//! Tests for routes module

use super::*;
use async_trait::async_trait;
use auth_handler::{AccessibleRepositories, AuthResult};
use axum::{body::Body, http::Request, http::StatusCode};
use std::sync::Arc;
use tower::ServiceExt;

struct EmptyRepositories;

#[async_trait]
impl AccessibleRepositories for EmptyRepositories {
    async fn list_accessible_repositories(&self) -> AuthResult<Vec<String>> {
        Ok(Vec::new())
    }
}

fn test_router() -> Router {
    create_router(AppState::new(Arc::new(EmptyRepositories)))
}

#[tokio::test]
async fn test_repositories_route_is_registered() {
    let request = Request::builder()
        .uri("/api/v1/github/repositories")
        .body(Body::empty())
        .unwrap();

    let response = test_router().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_routes_require_version_prefix() {
    let request = Request::builder()
        .uri("/github/repositories")
        .body(Body::empty())
        .unwrap();

    let response = test_router().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_repositories_route_rejects_post() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/github/repositories")
        .body(Body::empty())
        .unwrap();

    let response = test_router().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let request = Request::builder()
        .uri("/api/v1/health")
        .header(header::ORIGIN, "https://dashboard.example.com")
        .body(Body::empty())
        .unwrap();

    let response = test_router().oneshot(request).await.unwrap();

    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}
