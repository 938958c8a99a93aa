//! Operational HTTP endpoints.
//!
//! - `/`            : service index
//! - `/health`      : liveness
//! - `/readyz`      : readiness (503 when draining)
//! - `/ops/metrics` : Prometheus text format

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::app_state::AppState;

pub const SERVICE_NAME: &str = "echoparse-api";

pub async fn index() -> impl IntoResponse {
    Json(json!({
        "message": "echoparse API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "/metrics": "Get dashboard metrics",
            "/live-ratings": "Get live app store ratings",
            "/health": "Health check",
        }
    }))
}

pub async fn healthz() -> impl IntoResponse {
    Json(json!({ "status": "healthy", "service": SERVICE_NAME }))
}

pub async fn readyz(State(state): State<AppState>) -> impl IntoResponse {
    if state.is_draining() {
        (StatusCode::SERVICE_UNAVAILABLE, "draining")
    } else {
        (StatusCode::OK, "ready")
    }
}

pub async fn metrics(State(state): State<AppState>) -> Response {
    let extra = state.metrics_extra();
    let body = state.metrics().render(&extra);

    (
        StatusCode::OK,
        [(axum::http::header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        body,
    )
        .into_response()
}
