//! Live-rating retrieval from the two review platforms.
//!
//! `sources` talks HTTP to each platform; `fetcher` fans out to both and
//! contains each failure to its own branch.

pub mod fetcher;
pub mod sources;

pub use fetcher::LiveRatingFetcher;
pub use sources::{AppStoreSource, PlayStoreSource, RatingSource};
