//! RepoScout REST API
//!
//! This crate exposes the GitHub App installation flow over HTTP. It owns the
//! HTTP concerns only:
//! - request/response translation
//! - error mapping from domain to HTTP
//! - routing and server configuration
//!
//! The repositories themselves come from an [`AccessibleRepositories`]
//! implementation supplied through [`AppState`].

use std::sync::Arc;

use auth_handler::AccessibleRepositories;

pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;

// Re-export key types for convenience
pub use errors::{ApiError, ErrorResponse};
pub use server::{ApiConfig, ApiServer};

/// API version
pub const API_VERSION: &str = "v1";

/// Default API port
pub const DEFAULT_PORT: u16 = 3001;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Source of the repositories the GitHub App can access
    pub repositories: Arc<dyn AccessibleRepositories>,
}

impl AppState {
    /// Create new application state around a repository source
    pub fn new(repositories: Arc<dyn AccessibleRepositories>) -> Self {
        Self { repositories }
    }
}
