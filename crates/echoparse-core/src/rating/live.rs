use serde::Serialize;

use crate::metrics::alias::NOT_AVAILABLE;

/// Both stores rate on a five-star scale.
pub const LIVE_SCALE: &str = "5";

/// A rating fetched from a review platform at request time.
///
/// `raw_value` is only ever a finite number or `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiveRating {
    #[serde(rename = "value")]
    pub display_value: String,
    pub raw_value: Option<f64>,
    pub scale: String,
}

impl LiveRating {
    pub fn unknown() -> Self {
        Self {
            display_value: NOT_AVAILABLE.to_string(),
            raw_value: None,
            scale: LIVE_SCALE.to_string(),
        }
    }

    /// Non-finite input collapses to `unknown()`.
    pub fn from_raw(raw: Option<f64>) -> Self {
        match raw {
            Some(v) if v.is_finite() => Self {
                display_value: format!("{v:.2}"),
                raw_value: Some(v),
                scale: LIVE_SCALE.to_string(),
            },
            _ => Self::unknown(),
        }
    }

    pub fn is_known(&self) -> bool {
        self.raw_value.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiveRatings {
    pub app_store_live: LiveRating,
    pub play_store_live: LiveRating,
}

/// Wire envelope for the live-rating endpoint. Source outages live inside
/// the per-source ratings; `success` stays true.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiveRatingsResponse {
    pub success: bool,
    pub data: LiveRatings,
}

impl From<LiveRatings> for LiveRatingsResponse {
    fn from(data: LiveRatings) -> Self {
        Self {
            success: true,
            data,
        }
    }
}
