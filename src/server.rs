//! HTTP query surface.
//!
//! `/` renders the current snapshot for any method, `/health` and `/metrics`
//! serve operations. Every other path is a 404.

use anyhow::Context;
use axum::{
    Router,
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{any, get},
};
use tokio::net::TcpListener;
use tracing::error;

use crate::metrics;
use crate::snapshot::SnapshotReader;

#[derive(Clone)]
pub struct AppState {
    pub reader: SnapshotReader,
}

pub fn router(reader: SnapshotReader) -> Router {
    Router::new()
        .route("/", any(report_handler))
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .with_state(AppState { reader })
}

/// Binds the listener. `host` may be an IP literal or a resolvable name.
pub async fn bind(host: &str, port: u16) -> anyhow::Result<TcpListener> {
    TcpListener::bind((host, port))
        .await
        .with_context(|| format!("failed to bind {host}:{port}"))
}

async fn report_handler(State(state): State<AppState>) -> impl IntoResponse {
    metrics::REPORTS_TOTAL.inc();
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        state.reader.report(),
    )
}

async fn health_handler() -> &'static str {
    "OK"
}

async fn metrics_handler() -> impl IntoResponse {
    match metrics::encode() {
        Ok(body) => (StatusCode::OK, body),
        Err(e) => {
            error!(error = %e, "Failed to encode metrics");
            (StatusCode::INTERNAL_SERVER_ERROR, String::new())
        }
    }
}
