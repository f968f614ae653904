//! Axum router wiring, one router per listener.

use axum::{routing::get, Router};

use crate::{app, app_state::AppState, ops};

/// Application listener: the greeting route only.
pub fn build_app_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(app::hello))
        .with_state(state)
}

/// Metrics listener: exposition plus health and readiness checks.
pub fn build_metrics_router(state: AppState) -> Router {
    Router::new()
        .route("/metrics", get(ops::metrics))
        .route("/healthz", get(ops::healthz))
        .route("/readyz", get(ops::readyz))
        .with_state(state)
}
