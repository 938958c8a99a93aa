//! Persisted metric observations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Metadata key consulted when a record carries no `calculated_at` column.
pub const META_CALCULATED_AT: &str = "calculatedAt";

/// A stored metric value: numeric for most metrics, free text for a few.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Number(f64),
    Text(String),
}

impl MetricValue {
    /// Interpret a textual column value, preferring a finite number.
    pub fn from_text(s: &str) -> Self {
        match s.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => MetricValue::Number(n),
            _ => MetricValue::Text(s.to_string()),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetricValue::Number(n) => Some(*n),
            MetricValue::Text(_) => None,
        }
    }
}

/// One persisted observation of a named measurement.
///
/// Several records may share `metric_name`; the store does not enforce
/// uniqueness and the resolver picks the latest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    pub metric_name: String,
    pub metric_value: MetricValue,
    #[serde(default)]
    pub metric_meta: Map<String, Value>,
    pub time_period: String,
    #[serde(default)]
    pub calculated_at: Option<DateTime<Utc>>,
}

impl MetricRecord {
    pub fn new(
        metric_name: impl Into<String>,
        metric_value: MetricValue,
        time_period: impl Into<String>,
        calculated_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            metric_name: metric_name.into(),
            metric_value,
            metric_meta: Map::new(),
            time_period: time_period.into(),
            calculated_at,
        }
    }

    pub fn with_meta(mut self, meta: Map<String, Value>) -> Self {
        self.metric_meta = meta;
        self
    }

    /// Timestamp used for ordering: the column first, then
    /// `metric_meta.calculatedAt` (RFC 3339). `None` when neither is usable.
    pub fn effective_calculated_at(&self) -> Option<DateTime<Utc>> {
        self.calculated_at.or_else(|| {
            self.metric_meta
                .get(META_CALCULATED_AT)
                .and_then(Value::as_str)
                .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                .map(|dt| dt.with_timezone(&Utc))
        })
    }
}
