use std::fs;
use std::path::Path;

use async_trait::async_trait;

use echoparse_core::error::{EchoError, Result};
use echoparse_core::metrics::MetricRecord;

use super::MetricStore;

/// Fixed in-process record set. Used for local runs and tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryMetricStore {
    records: Vec<MetricRecord>,
}

impl MemoryMetricStore {
    pub fn new(records: Vec<MetricRecord>) -> Self {
        Self { records }
    }

    /// Load a JSON array of records.
    pub fn from_file(path: &Path) -> Result<Self> {
        let s = fs::read_to_string(path).map_err(|e| {
            EchoError::Store(format!("read seed file failed ({}): {e}", path.display()))
        })?;
        let records: Vec<MetricRecord> = serde_json::from_str(&s)
            .map_err(|e| EchoError::BadRequest(format!("invalid seed file: {e}")))?;
        tracing::info!(path = %path.display(), records = records.len(), "memory store seeded");
        Ok(Self { records })
    }
}

#[async_trait]
impl MetricStore for MemoryMetricStore {
    fn kind(&self) -> &'static str {
        "memory"
    }

    async fn fetch_records(&self, time_period: &str) -> Result<Vec<MetricRecord>> {
        Ok(self
            .records
            .iter()
            .filter(|r| r.time_period == time_period)
            .cloned()
            .collect())
    }
}
