//! Router-level tests with an in-memory store and mock rating upstreams.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use chrono::{TimeZone, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use echoparse_core::error::{EchoError, Result};
use echoparse_core::metrics::{MetricRecord, MetricValue};
use echoparse_core::rating::PatternExtractor;
use echoparse_gateway::app_state::AppState;
use echoparse_gateway::config;
use echoparse_gateway::live::{AppStoreSource, LiveRatingFetcher, PlayStoreSource};
use echoparse_gateway::router::build_router;
use echoparse_gateway::store::{MemoryMetricStore, MetricStore};

struct DownStore;

#[async_trait]
impl MetricStore for DownStore {
    fn kind(&self) -> &'static str {
        "down"
    }
    async fn fetch_records(&self, _time_period: &str) -> Result<Vec<MetricRecord>> {
        Err(EchoError::Store("connection refused".into()))
    }
}

fn fetcher(upstream: &str) -> LiveRatingFetcher {
    let client = reqwest::Client::new();
    LiveRatingFetcher::new(
        Arc::new(AppStoreSource::new(client.clone(), format!("{upstream}/lookup"))),
        Arc::new(PlayStoreSource::new(
            client,
            format!("{upstream}/details"),
            Arc::new(PatternExtractor::play_store().unwrap()),
        )),
    )
}

fn state(yaml: &str, store: Arc<dyn MetricStore>, upstream: &str) -> AppState {
    let cfg = config::load_from_str(yaml).unwrap();
    AppState::from_parts(cfg, store, fetcher(upstream)).unwrap()
}

async fn get(state: AppState, uri: &str) -> (StatusCode, Value) {
    let resp = build_router(state)
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn seeded() -> Arc<dyn MetricStore> {
    let day = |d| Some(Utc.with_ymd_and_hms(2025, 6, d, 6, 0, 0).unwrap());
    Arc::new(MemoryMetricStore::new(vec![
        MetricRecord::new("app_store_rating_30d", MetricValue::Number(4.2), "30d", day(1)),
        MetricRecord::new("app_store_rating_30d", MetricValue::Number(4.5), "30d", day(3)),
        MetricRecord::new("play_store_rating_30d", MetricValue::Number(-1.0), "30d", day(2)),
        MetricRecord::new("pipeline_rows_seen", MetricValue::Number(99.0), "30d", day(4)),
        MetricRecord::new("app_store_rating_30d", MetricValue::Number(1.0), "7d", day(9)),
    ]))
}

#[tokio::test]
async fn snapshot_picks_latest_and_reports_freshness() {
    let app = state("version: 1\n", seeded(), "http://127.0.0.1:9");
    let (status, body) = get(app, "/metrics").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["app_store_rating"]["value"], json!(4.5));
    assert_eq!(body["data"]["app_store_rating"]["display"], json!("4.5"));
    assert_eq!(body["data"]["play_store_rating"]["display"], json!("N/A"));
    assert!(body["data"].get("pipeline_rows_seen").is_none());
    assert_eq!(body["last_updated"], json!("2025-06-04T06:00:00+00:00"));
}

#[tokio::test]
async fn empty_store_is_no_data() {
    let store = Arc::new(MemoryMetricStore::default());
    let (status, body) = get(state("version: 1\n", store, "http://127.0.0.1:9"), "/metrics").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": false, "data": null, "last_updated": null }));
}

#[tokio::test]
async fn store_fault_is_request_failure() {
    let st = state("version: 1\n", Arc::new(DownStore), "http://127.0.0.1:9");
    let (status, body) = get(st.clone(), "/metrics").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], json!(false));
    assert!(body["error"].as_str().unwrap().contains("connection refused"));
    assert!(body.get("data").is_none());
    assert_eq!(st.metrics().store_errors.get(&[("store", "down")]), 1);
}

#[tokio::test]
async fn live_ratings_without_app_store_id() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/details"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<b>4.70 star</b>"))
        .mount(&upstream)
        .await;
    Mock::given(method("GET"))
        .and(path("/lookup"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{ "averageUserRating": 4.3 }]
        })))
        .expect(0)
        .mount(&upstream)
        .await;

    let yaml = "version: 1\nlive:\n  play_store_id: \"com.x\"\n";
    let st = state(yaml, seeded(), &upstream.uri());
    let (status, body) = get(st.clone(), "/live-ratings").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "success": true,
            "data": {
                "app_store_live": { "value": "N/A", "raw_value": null, "scale": "5" },
                "play_store_live": { "value": "4.70", "raw_value": 4.7, "scale": "5" }
            }
        })
    );
    assert_eq!(
        st.metrics()
            .live_source_outcomes
            .get(&[("source", "app_store"), ("outcome", "unknown")]),
        1
    );
}

#[tokio::test]
async fn live_ratings_stay_successful_when_both_sources_fail() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&upstream)
        .await;

    let yaml = "version: 1\nlive:\n  app_store_id: \"1\"\n  play_store_id: \"com.x\"\n";
    let (status, body) = get(state(yaml, seeded(), &upstream.uri()), "/live-ratings").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["app_store_live"]["raw_value"], Value::Null);
    assert_eq!(body["data"]["play_store_live"]["value"], json!("N/A"));
}

#[tokio::test]
async fn ops_endpoints() {
    let st = state("version: 1\n", seeded(), "http://127.0.0.1:9");

    let (status, body) = get(st.clone(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "healthy", "service": "echoparse-api" }));

    let (status, body) = get(st.clone(), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["endpoints"].get("/live-ratings").is_some());

    let (status, _) = get(st.clone(), "/readyz").await;
    assert_eq!(status, StatusCode::OK);
    st.set_draining();
    let (status, _) = get(st.clone(), "/readyz").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let _ = get(st.clone(), "/metrics").await;
    let resp = build_router(st)
        .oneshot(Request::builder().uri("/ops/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("echoparse_requests_total{outcome=\"ok\",route=\"metrics\"} 1"));
    assert!(text.contains("echoparse_draining 1"));
    assert!(text.contains("echoparse_alias_entries 7"));
}
