//! Request middleware
//!
//! Every request gets an id that appears in the start and completion log lines
//! and is returned in the `x-request-id` response header.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};

#[cfg(test)]
#[path = "middleware_tests.rs"]
mod tests;

/// Name of the response header carrying the request id
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Tracing middleware for request/response logging
pub async fn tracing_middleware(request: Request, next: Next) -> Response {
    // Generate request ID
    let request_id = uuid::Uuid::new_v4().to_string();

    tracing::info!(
        request_id = %request_id,
        method = %request.method(),
        uri = %request.uri(),
        "Request started"
    );

    let mut response = next.run(request).await;

    tracing::info!(
        request_id = %request_id,
        status = %response.status(),
        "Request completed"
    );

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}
