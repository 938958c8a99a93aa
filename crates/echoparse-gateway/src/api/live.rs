use std::time::Instant;

use axum::{extract::State, Json};

use echoparse_core::rating::{LiveRating, LiveRatingsResponse};

use crate::app_state::AppState;
use crate::live::{AppStoreSource, PlayStoreSource};

const ROUTE: &str = "live_ratings";

fn outcome(r: &LiveRating) -> &'static str {
    if r.is_known() {
        "known"
    } else {
        "unknown"
    }
}

/// Fetch both live ratings. Never fails as a whole: a source outage shows up
/// as `N/A` for that source only.
pub async fn get_live_ratings(State(state): State<AppState>) -> Json<LiveRatingsResponse> {
    let started = Instant::now();
    let live = &state.cfg().live;

    let ratings = state
        .fetcher()
        .fetch(live.app_store_id.as_deref(), live.play_store_id.as_deref())
        .await;

    let m = state.metrics();
    m.live_source_outcomes.inc(&[
        ("source", AppStoreSource::NAME),
        ("outcome", outcome(&ratings.app_store_live)),
    ]);
    m.live_source_outcomes.inc(&[
        ("source", PlayStoreSource::NAME),
        ("outcome", outcome(&ratings.play_store_live)),
    ]);
    m.requests.inc(&[("route", ROUTE), ("outcome", "ok")]);
    m.handler_duration.observe(&[("route", ROUTE)], started.elapsed());

    Json(LiveRatingsResponse::from(ratings))
}
