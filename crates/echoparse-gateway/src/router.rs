//! Axum router wiring.

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{api, app_state::AppState, ops};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(ops::index))
        .route("/health", get(ops::healthz))
        .route("/readyz", get(ops::readyz))
        .route("/ops/metrics", get(ops::metrics))
        .route("/metrics", get(api::snapshot::get_metrics))
        .route("/live-ratings", get(api::live::get_live_ratings))
        // the dashboard front-end is served from another origin
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
