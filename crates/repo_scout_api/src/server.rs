//! HTTP server configuration and startup

use anyhow::Context;
use axum::Router;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::signal;

use crate::{routes, AppState, DEFAULT_PORT};

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;

/// Environment variable naming the bind address
pub const API_HOST_ENV: &str = "API_HOST";

/// Environment variable naming the listen port
pub const API_PORT_ENV: &str = "API_PORT";

/// API server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Port to listen on
    pub port: u16,

    /// Host to bind to
    pub host: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl ApiConfig {
    /// Read `API_HOST` and `API_PORT` from the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    ///
    /// Unset or blank variables fall back to the defaults; a port that does not
    /// parse is an error.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let port = match read(API_PORT_ENV) {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("Invalid {API_PORT_ENV} '{raw}'"))?,
            None => defaults.port,
        };

        Ok(Self {
            port,
            host: read(API_HOST_ENV).unwrap_or(defaults.host),
        })
    }

    /// Socket address described by this configuration.
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let ip = self
            .host
            .parse::<std::net::IpAddr>()
            .with_context(|| format!("Invalid {API_HOST_ENV} '{}'", self.host))?;
        Ok(SocketAddr::from((ip, self.port)))
    }
}

/// API server
pub struct ApiServer {
    config: ApiConfig,
    state: AppState,
}

impl ApiServer {
    /// Create a new API server with the given configuration.
    pub fn new(config: ApiConfig, state: AppState) -> Self {
        Self { config, state }
    }

    /// Build the Axum router with all routes and middleware.
    pub fn router(&self) -> Router {
        routes::create_router(self.state.clone())
    }

    /// Start the server and listen for requests.
    ///
    /// Blocks until the server is shut down gracefully via CTRL+C (SIGINT) or
    /// SIGTERM.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured address is invalid or cannot be bound.
    pub async fn serve(self) -> anyhow::Result<()> {
        let addr = self.config.socket_addr()?;

        tracing::info!("Starting API server on {}", addr);

        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {addr}"))?;
        let app = self.router();

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}

/// Wait for CTRL+C, or SIGTERM on Unix
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install CTRL+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received CTRL+C, initiating graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        },
    }
}
