//! HTTP API for the sales ledger.
//!
//! Exposes submit, update, delete and list over JSON. All durable state
//! lives in the key-value store behind [`RecordStore`]; handlers share
//! nothing else.

mod error;
mod handlers;
mod middleware;
mod request;
mod response;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};

use crate::db::record_store::RecordStore;
use handlers::AppState;

pub fn router(records: Arc<RecordStore>) -> Router {
    Router::new()
        .route("/submit", post(handlers::handle_submit))
        .route("/update", post(handlers::handle_update))
        .route("/delete", post(handlers::handle_delete))
        .route("/list", get(handlers::handle_list))
        .layer(axum::middleware::from_fn(middleware::trace_requests))
        .with_state(AppState { records })
}

/// Serves the API on `addr` until Ctrl-C.
pub async fn serve(addr: SocketAddr, records: Arc<RecordStore>) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "sales ledger listening");

    axum::serve(listener, router(records))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("shutting down"),
        Err(e) => {
            tracing::error!(error = %e, "failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
