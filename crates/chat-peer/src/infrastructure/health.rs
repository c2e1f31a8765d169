//! Liveness endpoint for non-interactive (CI) mode.
//!
//! `GET /health` answers `200 OK` with `{"status":"UP"}`.  The endpoint never
//! looks at chat state; it only proves the process is up and serving.

use std::future::Future;
use std::io;
use std::net::SocketAddr;

use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::info;

/// Error type for the liveness server.
#[derive(Debug, Error)]
pub enum HealthError {
    #[error("failed to bind health endpoint on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },
    #[error("health server failed: {0}")]
    Serve(#[source] io::Error),
}

/// JSON body returned by `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    pub fn up() -> Self {
        Self {
            status: "UP".to_string(),
        }
    }
}

async fn health() -> Json<HealthStatus> {
    Json(HealthStatus::up())
}

/// Router exposing the liveness route.
pub fn health_router() -> Router {
    Router::new().route("/health", get(health))
}

/// Binds the liveness listener.
///
/// # Errors
///
/// Returns [`HealthError::Bind`] if the address is unavailable.
pub async fn bind_health(addr: SocketAddr) -> Result<TcpListener, HealthError> {
    TcpListener::bind(addr)
        .await
        .map_err(|source| HealthError::Bind { addr, source })
}

/// Serves `GET /health` on `listener` until `shutdown` resolves.
///
/// # Errors
///
/// Returns [`HealthError::Serve`] if the server stops with an I/O error.
pub async fn serve_health<F>(listener: TcpListener, shutdown: F) -> Result<(), HealthError>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        info!("health endpoint listening on http://{addr}/health");
    }

    axum::serve(listener, health_router())
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(HealthError::Serve)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
