//! Rating sources against a mock upstream.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;
use std::time::Duration;

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use echoparse_core::rating::{LiveRating, PatternExtractor};
use echoparse_gateway::live::{AppStoreSource, LiveRatingFetcher, PlayStoreSource, RatingSource};

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_millis(500))
        .build()
        .unwrap()
}

fn app_store(server: &MockServer) -> AppStoreSource {
    AppStoreSource::new(client(), format!("{}/lookup", server.uri()))
}

fn play_store(server: &MockServer) -> PlayStoreSource {
    PlayStoreSource::new(
        client(),
        format!("{}/store/apps/details", server.uri()),
        Arc::new(PatternExtractor::play_store().unwrap()),
    )
}

#[tokio::test]
async fn app_store_lookup_reads_average_rating() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/lookup"))
        .and(query_param("id", "677420559"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "resultCount": 1,
            "results": [{ "averageUserRating": 4.3 }]
        })))
        .mount(&server)
        .await;

    let v = app_store(&server).fetch_rating("677420559").await.unwrap();
    assert_eq!(v, 4.3);
}

#[tokio::test]
async fn app_store_non_numeric_rating_is_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/lookup"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [{ "averageUserRating": "great" }]
        })))
        .mount(&server)
        .await;

    let err = app_store(&server).fetch_rating("1").await.unwrap_err();
    assert_eq!(err.client_code().as_str(), "UPSTREAM_FAILED");
}

#[tokio::test]
async fn non_2xx_is_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    assert!(app_store(&server).fetch_rating("1").await.is_err());
    assert!(play_store(&server).fetch_rating("com.x").await.is_err());
}

#[tokio::test]
async fn play_store_page_is_scraped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/store/apps/details"))
        .and(query_param("id", "com.ifs.banking.fiid1454"))
        .and(query_param("hl", "en"))
        .and(query_param("gl", "US"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("<html><div>4.70 star</div></html>"),
        )
        .mount(&server)
        .await;

    let v = play_store(&server)
        .fetch_rating("com.ifs.banking.fiid1454")
        .await
        .unwrap();
    assert_eq!(v, 4.7);
}

#[tokio::test]
async fn slow_upstream_hits_client_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("4.9 star")
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    assert!(play_store(&server).fetch_rating("com.x").await.is_err());
}

#[tokio::test]
async fn network_failure_on_one_source_leaves_the_other() {
    let healthy = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/store/apps/details"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<span>4.70 star</span>"))
        .mount(&healthy)
        .await;

    // nothing listens on port 9 (discard) in the test environment
    let dead = AppStoreSource::new(client(), "http://127.0.0.1:9/lookup");
    let fetcher = LiveRatingFetcher::new(Arc::new(dead), Arc::new(play_store(&healthy)));

    let r = fetcher.fetch(Some("677420559"), Some("com.x")).await;
    assert_eq!(r.app_store_live, LiveRating::unknown());
    assert_eq!(r.play_store_live.raw_value, Some(4.7));
    assert_eq!(r.play_store_live.display_value, "4.70");
}
