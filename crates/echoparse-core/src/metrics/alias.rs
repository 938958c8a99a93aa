//! Internal metric name -> public alias table.
//!
//! The table is static configuration: the built-in entries match the names the
//! ingestion pipeline writes, and the gateway config may replace them wholesale.
//! Each entry also says how the value is rendered for display.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{EchoError, Result};
use crate::metrics::record::MetricValue;

/// Placeholder shown when a value is missing or a sentinel.
pub const NOT_AVAILABLE: &str = "N/A";

/// How a metric value is rendered into its `display` string.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DisplayFormat {
    /// Number or text as stored.
    #[default]
    Raw,
    /// Fixed number of decimals.
    Fixed {
        decimals: usize,
        #[serde(default)]
        sentinel: Option<f64>,
    },
    /// `12.5%`.
    Percent {
        #[serde(default)]
        sentinel: Option<f64>,
    },
    /// `+12.5%` / `-3.0%`.
    SignedPercent,
    /// String field out of the record metadata (e.g. `topic`).
    MetaField { field: String },
}

fn is_sentinel(n: f64, sentinel: Option<f64>) -> bool {
    sentinel.is_some_and(|s| (n - s).abs() < f64::EPSILON)
}

// Whole numbers keep their `.0` (`12.0%`), which is what the dashboard shows.
fn percent_text(n: f64) -> String {
    format!("{n:?}%")
}

impl DisplayFormat {
    pub fn render(&self, value: &MetricValue, meta: &Map<String, Value>) -> String {
        match self {
            DisplayFormat::Raw => match value {
                MetricValue::Number(n) => n.to_string(),
                MetricValue::Text(s) => s.clone(),
            },
            DisplayFormat::Fixed { decimals, sentinel } => match value.as_f64() {
                Some(n) if !is_sentinel(n, *sentinel) => format!("{n:.prec$}", prec = *decimals),
                _ => NOT_AVAILABLE.to_string(),
            },
            DisplayFormat::Percent { sentinel } => match value.as_f64() {
                Some(n) if !is_sentinel(n, *sentinel) => percent_text(n),
                _ => NOT_AVAILABLE.to_string(),
            },
            DisplayFormat::SignedPercent => match value.as_f64() {
                Some(n) if n >= 0.0 => format!("+{}", percent_text(n)),
                Some(n) => percent_text(n),
                None => NOT_AVAILABLE.to_string(),
            },
            DisplayFormat::MetaField { field } => match meta.get(field) {
                Some(Value::String(s)) => s.clone(),
                Some(Value::Null) | None => NOT_AVAILABLE.to_string(),
                Some(other) => other.to_string(),
            },
        }
    }
}

/// One row of the alias table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricAlias {
    /// Internal storage key, e.g. `one_star_reviews_pct`.
    pub metric: String,
    /// Public response key, e.g. `one_star_reviews`.
    pub alias: String,
    #[serde(default)]
    pub format: DisplayFormat,
    /// Optional human label for the value range.
    #[serde(default)]
    pub scale: Option<String>,
}

impl MetricAlias {
    pub fn new(metric: &str, alias: &str, format: DisplayFormat) -> Self {
        Self {
            metric: metric.to_string(),
            alias: alias.to_string(),
            format,
            scale: None,
        }
    }

    pub fn with_scale(mut self, scale: &str) -> Self {
        self.scale = Some(scale.to_string());
        self
    }
}

#[derive(Debug, Clone)]
pub struct AliasTable {
    entries: Vec<MetricAlias>,
    by_metric: HashMap<String, usize>,
}

impl AliasTable {
    /// Build a table. Both internal names and public aliases must be unique,
    /// otherwise two metrics could claim one snapshot slot.
    pub fn new(entries: Vec<MetricAlias>) -> Result<Self> {
        let mut by_metric = HashMap::with_capacity(entries.len());
        {
            let mut aliases: HashMap<&str, &str> = HashMap::with_capacity(entries.len());
            for (i, e) in entries.iter().enumerate() {
                if e.metric.is_empty() || e.alias.is_empty() {
                    return Err(EchoError::BadRequest(
                        "alias entries need non-empty metric and alias".into(),
                    ));
                }
                if by_metric.insert(e.metric.clone(), i).is_some() {
                    return Err(EchoError::BadRequest(format!(
                        "duplicate alias entry for metric: {}",
                        e.metric
                    )));
                }
                if let Some(prev) = aliases.insert(e.alias.as_str(), e.metric.as_str()) {
                    return Err(EchoError::BadRequest(format!(
                        "public alias {} claimed by both {} and {}",
                        e.alias, prev, e.metric
                    )));
                }
            }
        }
        Ok(Self { entries, by_metric })
    }

    /// Names written by the ingestion pipeline and their dashboard keys.
    pub fn builtin() -> Self {
        let rating = DisplayFormat::Fixed {
            decimals: 1,
            sentinel: Some(-1.0),
        };
        let entries = vec![
            MetricAlias::new(
                "one_star_reviews_pct",
                "one_star_reviews",
                DisplayFormat::Percent {
                    sentinel: Some(-1.0),
                },
            ),
            MetricAlias::new(
                "avg_sentiment",
                "avg_sentiment",
                DisplayFormat::Fixed {
                    decimals: 2,
                    sentinel: Some(-999.0),
                },
            )
            .with_scale("on [-1.0, 1.0] scale"),
            MetricAlias::new(
                "trending_topic",
                "trending_topic",
                DisplayFormat::MetaField {
                    field: "topic".into(),
                },
            ),
            MetricAlias::new(
                "review_volume_delta_pct",
                "review_volume_delta",
                DisplayFormat::SignedPercent,
            ),
            MetricAlias::new(
                "platform_score_gap",
                "platform_score_gap",
                DisplayFormat::MetaField {
                    field: "gap_text".into(),
                },
            ),
            MetricAlias::new("app_store_rating_30d", "app_store_rating", rating.clone()),
            MetricAlias::new("play_store_rating_30d", "play_store_rating", rating),
        ];

        let by_metric = entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.metric.clone(), i))
            .collect();
        Self { entries, by_metric }
    }

    pub fn lookup(&self, metric: &str) -> Option<&MetricAlias> {
        self.by_metric.get(metric).map(|&i| &self.entries[i])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for AliasTable {
    fn default() -> Self {
        Self::builtin()
    }
}
