//! Metric-record stores.
//!
//! The gateway only ever does one unordered bulk read per request; ordering
//! and deduplication belong to the resolver in `echoparse-core`.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use echoparse_core::error::Result;
use echoparse_core::metrics::MetricRecord;

pub use memory::MemoryMetricStore;
pub use postgres::PgMetricStore;

#[async_trait]
pub trait MetricStore: Send + Sync {
    /// Short label for logs and metrics.
    fn kind(&self) -> &'static str;

    /// All records for `time_period`, in no particular order.
    async fn fetch_records(&self, time_period: &str) -> Result<Vec<MetricRecord>>;
}
