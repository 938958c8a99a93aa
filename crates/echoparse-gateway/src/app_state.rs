//! Shared application state for the echoparse gateway.
//!
//! The store handle and the HTTP client are built exactly once here and
//! injected into the handlers; nothing reaches for a global. Tests build the
//! state from parts with an in-memory store and sources pointed at a mock
//! server.

use std::sync::Arc;
use std::time::Duration;

use echoparse_core::error::{EchoError, Result};
use echoparse_core::metrics::SnapshotResolver;
use echoparse_core::rating::PatternExtractor;

use crate::config::{GatewayConfig, StoreSection};
use crate::live::{AppStoreSource, LiveRatingFetcher, PlayStoreSource};
use crate::obs::GatewayMetrics;
use crate::store::{MemoryMetricStore, MetricStore, PgMetricStore};

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: GatewayConfig,
    store: Arc<dyn MetricStore>,
    resolver: SnapshotResolver,
    fetcher: LiveRatingFetcher,
    metrics: GatewayMetrics,
}

impl AppState {
    /// Build application state from config.
    /// Returns Result so main can handle errors gracefully (no panic).
    pub fn new(cfg: GatewayConfig) -> Result<Self> {
        // 1) Metric store
        let store: Arc<dyn MetricStore> = match &cfg.store {
            StoreSection::Postgres(pg) => {
                let url = pg.resolve_url()?;
                Arc::new(PgMetricStore::connect_lazy(&url, pg.max_connections)?)
            }
            StoreSection::Memory(mem) => match &mem.seed_file {
                Some(path) => Arc::new(MemoryMetricStore::from_file(path)?),
                None => {
                    tracing::warn!("memory store without seed_file, snapshot will report no data");
                    Arc::new(MemoryMetricStore::default())
                }
            },
        };

        // 2) One HTTP client for both rating sources
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(cfg.live.timeout_ms))
            .user_agent(concat!("echoparse/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| EchoError::Internal(format!("http client build failed: {e}")))?;

        let fetcher = LiveRatingFetcher::new(
            Arc::new(AppStoreSource::new(
                client.clone(),
                cfg.live.app_store_lookup_url.clone(),
            )),
            Arc::new(PlayStoreSource::new(
                client,
                cfg.live.play_store_details_url.clone(),
                Arc::new(PatternExtractor::play_store()?),
            )),
        );

        if cfg.live.app_store_id.is_none() {
            tracing::warn!("live.app_store_id not set, app store rating will always be N/A");
        }
        if cfg.live.play_store_id.is_none() {
            tracing::warn!("live.play_store_id not set, play store rating will always be N/A");
        }

        Self::from_parts(cfg, store, fetcher)
    }

    /// Assemble state from prebuilt collaborators.
    pub fn from_parts(
        cfg: GatewayConfig,
        store: Arc<dyn MetricStore>,
        fetcher: LiveRatingFetcher,
    ) -> Result<Self> {
        let resolver = SnapshotResolver::new(cfg.snapshot.alias_table()?);
        tracing::info!(
            store = store.kind(),
            aliases = resolver.aliases().len(),
            time_period = %cfg.snapshot.time_period,
            "app state ready"
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                cfg,
                store,
                resolver,
                fetcher,
                metrics: GatewayMetrics::default(),
            }),
        })
    }

    pub fn cfg(&self) -> &GatewayConfig {
        &self.inner.cfg
    }

    pub fn store(&self) -> &dyn MetricStore {
        self.inner.store.as_ref()
    }

    pub fn resolver(&self) -> &SnapshotResolver {
        &self.inner.resolver
    }

    pub fn fetcher(&self) -> &LiveRatingFetcher {
        &self.inner.fetcher
    }

    pub fn metrics(&self) -> &GatewayMetrics {
        &self.inner.metrics
    }

    pub fn is_draining(&self) -> bool {
        self.inner.metrics.is_draining()
    }

    pub fn set_draining(&self) {
        self.inner.metrics.set_draining();
    }

    /// Static gauges appended to the metrics exposition.
    pub fn metrics_extra(&self) -> Vec<(&'static str, u64)> {
        vec![
            ("echoparse_alias_entries", self.inner.resolver.aliases().len() as u64),
            (
                "echoparse_live_sources_configured",
                [&self.inner.cfg.live.app_store_id, &self.inner.cfg.live.play_store_id]
                    .iter()
                    .filter(|id| id.is_some())
                    .count() as u64,
            ),
        ]
    }
}
