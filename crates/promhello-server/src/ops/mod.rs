//! Operational HTTP endpoints, served on the metrics listener.
//!
//! - `/healthz` : liveness
//! - `/readyz`  : readiness (503 when draining)
//! - `/metrics` : Prometheus text format, optionally filtered with `name[]=...`

use axum::{
    extract::{RawQuery, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use promhello_core::metrics::CONTENT_TYPE;

use crate::app_state::AppState;

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

pub async fn readyz(State(state): State<AppState>) -> impl IntoResponse {
    if state.is_draining() {
        (StatusCode::SERVICE_UNAVAILABLE, "draining")
    } else {
        (StatusCode::OK, "ready")
    }
}

pub async fn metrics(State(state): State<AppState>, RawQuery(query): RawQuery) -> Response {
    let names = query.as_deref().map(name_filter).unwrap_or_default();
    let body = state.registry().render_filtered(&names);

    (StatusCode::OK, [(header::CONTENT_TYPE, CONTENT_TYPE)], body).into_response()
}

/// Collect non-empty `name[]` values from a raw query string.
/// Keys and values are fully percent-decoded first.
fn name_filter(query: &str) -> Vec<String> {
    let pairs: Vec<(String, String)> = match serde_urlencoded::from_str(query) {
        Ok(pairs) => pairs,
        Err(e) => {
            tracing::debug!(error = %e, "unparsable metrics query, rendering all families");
            return Vec::new();
        }
    };
    pairs
        .into_iter()
        .filter(|(k, v)| k == "name[]" && !v.is_empty())
        .map(|(_, v)| v)
        .collect()
}
