use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use echoparse_core::error::{EchoError, Result};
use echoparse_core::rating::{app_store_rating, RatingExtractor};

/// One external review platform.
#[async_trait]
pub trait RatingSource: Send + Sync {
    fn name(&self) -> &'static str;

    /// Current average rating for `id`. Every failure mode, including an
    /// unparsable figure, is an `Err`.
    async fn fetch_rating(&self, id: &str) -> Result<f64>;
}

/// iTunes lookup API: `GET {lookup_url}?id={id}` returning JSON.
pub struct AppStoreSource {
    client: reqwest::Client,
    lookup_url: String,
}

impl AppStoreSource {
    pub const NAME: &'static str = "app_store";

    pub fn new(client: reqwest::Client, lookup_url: impl Into<String>) -> Self {
        Self {
            client,
            lookup_url: lookup_url.into(),
        }
    }
}

#[async_trait]
impl RatingSource for AppStoreSource {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn fetch_rating(&self, id: &str) -> Result<f64> {
        let resp = self
            .client
            .get(&self.lookup_url)
            .query(&[("id", id)])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| EchoError::upstream(Self::NAME, e.to_string()))?;

        let payload: Value = resp
            .json()
            .await
            .map_err(|e| EchoError::upstream(Self::NAME, format!("invalid json: {e}")))?;

        app_store_rating(&payload).ok_or_else(|| {
            EchoError::upstream(Self::NAME, "averageUserRating missing or not a number")
        })
    }
}

/// Play Store details page, scraped with a `RatingExtractor`.
pub struct PlayStoreSource {
    client: reqwest::Client,
    details_url: String,
    extractor: Arc<dyn RatingExtractor>,
}

impl PlayStoreSource {
    pub const NAME: &'static str = "play_store";

    pub fn new(
        client: reqwest::Client,
        details_url: impl Into<String>,
        extractor: Arc<dyn RatingExtractor>,
    ) -> Self {
        Self {
            client,
            details_url: details_url.into(),
            extractor,
        }
    }
}

#[async_trait]
impl RatingSource for PlayStoreSource {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn fetch_rating(&self, id: &str) -> Result<f64> {
        let page = self
            .client
            .get(&self.details_url)
            .query(&[("id", id), ("hl", "en"), ("gl", "US")])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| EchoError::upstream(Self::NAME, e.to_string()))?
            .text()
            .await
            .map_err(|e| EchoError::upstream(Self::NAME, format!("read body failed: {e}")))?;

        // A miss here usually means the page layout moved, not that the app
        // lost its rating.
        self.extractor
            .extract_rating(&page)
            .ok_or_else(|| EchoError::upstream(Self::NAME, "no rating marker in page"))
    }
}
