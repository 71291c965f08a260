//! HTTP routing configuration
//!
//! All routes are prefixed with `/api/v1`:
//!
//! - GET    /api/v1/github/repositories - Repositories the GitHub App can access
//! - GET    /api/v1/health - Health check

use axum::{
    http::{header, Method},
    middleware,
    routing::get,
    Router,
};
use std::time::Duration;
use tower_http::{
    cors::CorsLayer,
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};

use crate::{handlers, middleware as api_middleware, AppState};

#[cfg(test)]
#[path = "routes_tests.rs"]
mod tests;

/// Overall deadline for a single API request
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Create the complete API router with all routes configured.
///
/// This function sets up:
/// - All endpoint routes
/// - CORS configuration
/// - Request tracing
/// - Timeout handling
pub fn create_router(state: AppState) -> Router {
    // Read-only API, any origin may call it
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(false)
        .max_age(Duration::from_secs(3600));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new())
        .on_response(DefaultOnResponse::new());

    let timeout_layer = TimeoutLayer::new(REQUEST_TIMEOUT);

    let api_v1 = Router::new()
        .route(
            "/github/repositories",
            get(handlers::list_github_repositories),
        )
        .route("/health", get(handlers::health_check))
        .layer(middleware::from_fn(api_middleware::tracing_middleware))
        .layer(timeout_layer)
        .layer(trace_layer)
        .layer(cors)
        .with_state(state);

    Router::new().nest("/api/v1", api_v1)
}
