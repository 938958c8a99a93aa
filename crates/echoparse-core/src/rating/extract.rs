//! Rating extraction from raw upstream payloads.
//!
//! The play-store figure is scraped out of page markup and breaks silently
//! whenever that markup changes. Extraction fails closed (`None`) and lives
//! behind `RatingExtractor` so the strategy can be swapped without touching
//! the fetcher.

use regex::Regex;
use serde_json::Value;

use crate::error::{EchoError, Result};

/// JSON-LD block embedded in the play-store details page.
pub const PLAY_AGGREGATE_RATING: &str = r#""aggregateRating"\s*:\s*\{\s*"@type"\s*:\s*"AggregateRating"\s*,\s*"ratingValue"\s*:\s*"([0-9.]+)""#;
/// Visible "4.7 star" label. The token may not follow a digit or `.`, so the
/// tail of a longer number (`14.7 stars`) never reads as a rating.
pub const PLAY_STAR_LABEL: &str = r"(?:^|[^0-9.])([0-9](?:\.[0-9]+)?)\s*stars?\b";
/// Upper bound of the star scale; anything above it is a misread.
pub const MAX_STARS: f64 = 5.0;

pub trait RatingExtractor: Send + Sync {
    /// Pull a single finite rating out of page content.
    fn extract_rating(&self, page: &str) -> Option<f64>;
}

/// Ordered list of marker patterns, each with one capture group around the
/// numeric token. The first pattern that matches decides; if its token does
/// not parse or falls outside `0..=MAX_STARS`, the result is `None` and later
/// patterns are not consulted.
#[derive(Debug, Clone)]
pub struct PatternExtractor {
    patterns: Vec<Regex>,
}

impl PatternExtractor {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|p| {
                let re = Regex::new(p.as_ref())
                    .map_err(|e| EchoError::BadRequest(format!("invalid rating pattern: {e}")))?;
                if re.captures_len() < 2 {
                    return Err(EchoError::BadRequest(format!(
                        "rating pattern needs a capture group: {}",
                        p.as_ref()
                    )));
                }
                Ok(re)
            })
            .collect::<Result<Vec<_>>>()?;
        if patterns.is_empty() {
            return Err(EchoError::BadRequest("no rating patterns configured".into()));
        }
        Ok(Self { patterns })
    }

    pub fn play_store() -> Result<Self> {
        Self::new(&[PLAY_AGGREGATE_RATING, PLAY_STAR_LABEL])
    }
}

impl RatingExtractor for PatternExtractor {
    fn extract_rating(&self, page: &str) -> Option<f64> {
        let caps = self.patterns.iter().find_map(|re| re.captures(page))?;
        let token = caps.get(1)?.as_str();
        token
            .parse::<f64>()
            .ok()
            .filter(|v| (0.0..=MAX_STARS).contains(v))
    }
}

/// `results[0].averageUserRating` from an app-store lookup response.
/// Only a JSON number counts; strings, nulls and missing fields are `None`.
pub fn app_store_rating(payload: &Value) -> Option<f64> {
    payload
        .get("results")?
        .as_array()?
        .first()?
        .get("averageUserRating")?
        .as_f64()
        .filter(|v| v.is_finite())
}
