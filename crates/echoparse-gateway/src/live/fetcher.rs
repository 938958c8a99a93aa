//! Fan-out / fan-in over the two rating sources.
//!
//! Each source runs as its own task and is awaited unconditionally. Errors,
//! and even panics, are mapped to `LiveRating::unknown()` inside that branch,
//! so one platform going down never changes the other's result.

use std::sync::Arc;

use echoparse_core::rating::{LiveRating, LiveRatings};

use super::sources::RatingSource;

#[derive(Clone)]
pub struct LiveRatingFetcher {
    app_store: Arc<dyn RatingSource>,
    play_store: Arc<dyn RatingSource>,
}

impl LiveRatingFetcher {
    pub fn new(app_store: Arc<dyn RatingSource>, play_store: Arc<dyn RatingSource>) -> Self {
        Self {
            app_store,
            play_store,
        }
    }

    /// Resolve both ratings concurrently. A missing id skips that source.
    pub async fn fetch(
        &self,
        app_store_id: Option<&str>,
        play_store_id: Option<&str>,
    ) -> LiveRatings {
        let app = tokio::spawn(resolve_one(
            Arc::clone(&self.app_store),
            app_store_id.map(str::to_owned),
        ));
        let play = tokio::spawn(resolve_one(
            Arc::clone(&self.play_store),
            play_store_id.map(str::to_owned),
        ));

        let (app, play) = tokio::join!(app, play);

        LiveRatings {
            app_store_live: joined(self.app_store.name(), app),
            play_store_live: joined(self.play_store.name(), play),
        }
    }
}

async fn resolve_one(source: Arc<dyn RatingSource>, id: Option<String>) -> LiveRating {
    let Some(id) = id.filter(|s| !s.trim().is_empty()) else {
        tracing::debug!(source = source.name(), "no id configured, skipped");
        return LiveRating::unknown();
    };

    match source.fetch_rating(&id).await {
        Ok(v) => {
            let rating = LiveRating::from_raw(Some(v));
            tracing::debug!(
                source = source.name(),
                %id,
                value = %rating.display_value,
                "live rating"
            );
            rating
        }
        Err(e) => {
            tracing::warn!(source = source.name(), %id, error = %e, "live rating unavailable");
            LiveRating::unknown()
        }
    }
}

fn joined(name: &'static str, res: Result<LiveRating, tokio::task::JoinError>) -> LiveRating {
    res.unwrap_or_else(|e| {
        tracing::error!(source = name, error = %e, "live rating task aborted");
        LiveRating::unknown()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use echoparse_core::error::{EchoError, Result};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::Barrier;

    struct Fixed {
        name: &'static str,
        outcome: std::result::Result<f64, &'static str>,
        calls: AtomicUsize,
    }

    impl Fixed {
        fn new(name: &'static str, outcome: std::result::Result<f64, &'static str>) -> Arc<Self> {
            Arc::new(Self {
                name,
                outcome,
                calls: AtomicUsize::new(0),
            })
        }
        fn ok(name: &'static str, v: f64) -> Arc<Self> {
            Self::new(name, Ok(v))
        }
        fn failing(name: &'static str) -> Arc<Self> {
            Self::new(name, Err("connection refused"))
        }
    }

    #[async_trait]
    impl RatingSource for Fixed {
        fn name(&self) -> &'static str {
            self.name
        }
        async fn fetch_rating(&self, _id: &str) -> Result<f64> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcome.map_err(|r| EchoError::upstream(self.name, r))
        }
    }

    struct Panicking;

    #[async_trait]
    impl RatingSource for Panicking {
        fn name(&self) -> &'static str {
            "play_store"
        }
        async fn fetch_rating(&self, _id: &str) -> Result<f64> {
            panic!("extractor bug");
        }
    }

    /// Completes only once the other source has also started.
    struct Rendezvous {
        name: &'static str,
        barrier: Arc<Barrier>,
    }

    #[async_trait]
    impl RatingSource for Rendezvous {
        fn name(&self) -> &'static str {
            self.name
        }
        async fn fetch_rating(&self, _id: &str) -> Result<f64> {
            self.barrier.wait().await;
            Ok(4.0)
        }
    }

    #[tokio::test]
    async fn both_sources_ok() {
        let f = LiveRatingFetcher::new(Fixed::ok("app_store", 4.3), Fixed::ok("play_store", 4.7));
        let r = f.fetch(Some("1"), Some("com.x")).await;
        assert_eq!(r.app_store_live.raw_value, Some(4.3));
        assert_eq!(r.play_store_live.display_value, "4.70");
    }

    #[tokio::test]
    async fn one_failure_is_contained() {
        let f = LiveRatingFetcher::new(Fixed::failing("app_store"), Fixed::ok("play_store", 4.7));
        let r = f.fetch(Some("1"), Some("com.x")).await;
        assert_eq!(r.app_store_live, LiveRating::unknown());
        assert_eq!(r.play_store_live, LiveRating::from_raw(Some(4.7)));
    }

    #[tokio::test]
    async fn missing_id_skips_the_call() {
        let app = Fixed::ok("app_store", 4.3);
        let f = LiveRatingFetcher::new(app.clone(), Fixed::ok("play_store", 4.7));
        let r = f.fetch(None, Some("com.x")).await;
        assert_eq!(r.app_store_live, LiveRating::unknown());
        assert_eq!(r.play_store_live.raw_value, Some(4.7));
        assert_eq!(app.calls.load(Ordering::SeqCst), 0);

        let r = f.fetch(Some("  "), None).await;
        assert!(!r.app_store_live.is_known());
        assert!(!r.play_store_live.is_known());
    }

    #[tokio::test]
    async fn panicking_source_does_not_take_down_the_other() {
        let f = LiveRatingFetcher::new(Fixed::ok("app_store", 4.3), Arc::new(Panicking));
        let r = f.fetch(Some("1"), Some("com.x")).await;
        assert_eq!(r.app_store_live.raw_value, Some(4.3));
        assert_eq!(r.play_store_live, LiveRating::unknown());
    }

    #[tokio::test]
    async fn sources_run_concurrently() {
        let barrier = Arc::new(Barrier::new(2));
        let meet = |name| {
            Arc::new(Rendezvous {
                name,
                barrier: Arc::clone(&barrier),
            })
        };
        let f = LiveRatingFetcher::new(meet("app_store"), meet("play_store"));
        // Sequential calls would park the first source at the barrier forever.
        let r = tokio::time::timeout(Duration::from_secs(5), f.fetch(Some("1"), Some("com.x")))
            .await
            .unwrap();
        assert!(r.app_store_live.is_known() && r.play_store_live.is_known());
    }
}
