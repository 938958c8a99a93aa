//! Live ratings from the two review platforms.

pub mod extract;
pub mod live;

pub use extract::{app_store_rating, PatternExtractor, RatingExtractor};
pub use live::{LiveRating, LiveRatings, LiveRatingsResponse, LIVE_SCALE};
