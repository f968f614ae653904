//! Application routes served on the app listener.

use axum::{extract::State, http::header, response::IntoResponse};

use crate::app_state::AppState;

pub const GREETING: &str = "Hello, Promethues!";

/// `GET /`: count the request, then greet.
pub async fn hello(State(state): State<AppState>) -> impl IntoResponse {
    state.requests().inc();
    tracing::debug!(total = state.requests().get(), "greeting served");
    ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], GREETING)
}
