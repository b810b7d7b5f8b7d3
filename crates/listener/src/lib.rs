//! Draftsmith HTTP trigger.
//!
//! Exposes the pipeline over HTTP:
//!
//! | Route | Purpose |
//! |-------|---------|
//! | `POST /api/generate` | run the pipeline for `{"prd": "..."}` |
//! | `GET /api/runs/{run_id}/logs` | the run's agent log entries, oldest first |
//!
//! Every response uses the `{"success": bool, "data" | "error": ...}` envelope.
//! CORS allows any origin.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Request parsing and status-code mapping live here. The
//! pipeline itself is reached only through [`nodes::PipelineExecutor`].

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{header, Method};
use axum::routing::{get, post};
use axum::Router;
use nodes::PipelineExecutor;
use pipeline::RunLogStore;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

pub mod error;
pub mod routes;

pub use error::{ApiError, ApiResponse};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Runs the pipeline.
    pub executor: Arc<PipelineExecutor>,
    /// Read side of the run log, for the timeline route.
    pub log_store: Arc<dyn RunLogStore>,
}

impl AppState {
    pub fn new(executor: Arc<PipelineExecutor>, log_store: Arc<dyn RunLogStore>) -> Self {
        Self {
            executor,
            log_store,
        }
    }
}

/// Builds the application router with CORS applied.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/api/generate", post(routes::generate))
        .route("/api/runs/{run_id}/logs", get(routes::run_logs))
        .layer(cors)
        .with_state(state)
}

/// Binds `addr` and serves until Ctrl-C.
///
/// # Errors
///
/// Returns the I/O error if the address cannot be bound or the server fails.
pub async fn serve(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to install Ctrl-C handler");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
