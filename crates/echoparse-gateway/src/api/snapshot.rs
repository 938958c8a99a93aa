use std::time::Instant;

use axum::{extract::State, Json};

use echoparse_core::metrics::{Resolution, SnapshotResponse};

use super::ApiError;
use crate::app_state::AppState;

const ROUTE: &str = "metrics";

/// Read every record for the configured period and reduce it to the latest
/// value per public alias.
pub async fn get_metrics(
    State(state): State<AppState>,
) -> Result<Json<SnapshotResponse>, ApiError> {
    let started = Instant::now();
    let m = state.metrics();
    let period = state.cfg().snapshot.time_period.as_str();

    let records = match state.store().fetch_records(period).await {
        Ok(r) => r,
        Err(e) => {
            tracing::error!(store = state.store().kind(), error = %e, "metric store read failed");
            m.store_errors.inc(&[("store", state.store().kind())]);
            m.requests.inc(&[("route", ROUTE), ("outcome", "error")]);
            return Err(e.into());
        }
    };

    let resolution = state.resolver().resolve(&records);
    let outcome = match &resolution {
        Resolution::NoData => {
            tracing::info!(%period, "no metric records ingested yet");
            m.snapshot_no_data.inc(&[]);
            "no_data"
        }
        Resolution::Snapshot(s) => {
            tracing::debug!(
                records = records.len(),
                entries = s.entries.len(),
                "snapshot resolved"
            );
            "ok"
        }
    };

    m.requests.inc(&[("route", ROUTE), ("outcome", outcome)]);
    m.handler_duration.observe(&[("route", ROUTE)], started.elapsed());
    Ok(Json(SnapshotResponse::from(resolution)))
}
