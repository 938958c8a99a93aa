//! Latest-per-metric reduction.
//!
//! Records arrive in whatever order the store returns them. The resolver
//! re-derives "latest" from timestamps on every call instead of trusting that
//! order, so a store that stops sorting cannot change the answer.

use std::collections::BTreeMap;
use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::metrics::alias::AliasTable;
use crate::metrics::record::{MetricRecord, MetricValue};

/// Snapshot slot for one public alias.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotEntry {
    pub value: MetricValue,
    pub display: String,
    pub meta: Map<String, Value>,
    pub time_period: String,
    pub calculated_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MetricSnapshot {
    /// Keyed by public alias.
    pub entries: BTreeMap<String, SnapshotEntry>,
    /// Latest effective timestamp over every input record, aliased or not.
    pub last_updated: Option<DateTime<Utc>>,
}

/// Outcome of a resolve call. `NoData` means the store had nothing at all,
/// which callers must be able to tell apart from an empty snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    NoData,
    Snapshot(MetricSnapshot),
}

/// Wire envelope for the snapshot endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotResponse {
    pub success: bool,
    pub data: Option<BTreeMap<String, SnapshotEntry>>,
    pub last_updated: Option<String>,
}

impl From<Resolution> for SnapshotResponse {
    fn from(r: Resolution) -> Self {
        match r {
            Resolution::NoData => SnapshotResponse {
                success: false,
                data: None,
                last_updated: None,
            },
            Resolution::Snapshot(s) => SnapshotResponse {
                success: true,
                data: Some(s.entries),
                last_updated: s.last_updated.map(|t| t.to_rfc3339()),
            },
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SnapshotResolver {
    aliases: AliasTable,
}

impl SnapshotResolver {
    pub fn new(aliases: AliasTable) -> Self {
        Self { aliases }
    }

    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    /// Reduce `records` to one entry per alias.
    ///
    /// Ordering is by effective timestamp, newest first; records without any
    /// timestamp sort after all dated ones. The sort is stable, so equal
    /// timestamps keep input order and the earlier record wins.
    pub fn resolve(&self, records: &[MetricRecord]) -> Resolution {
        if records.is_empty() {
            return Resolution::NoData;
        }

        let mut ordered: Vec<(Option<DateTime<Utc>>, &MetricRecord)> = records
            .iter()
            .map(|r| (r.effective_calculated_at(), r))
            .collect();
        ordered.sort_by(|a, b| b.0.cmp(&a.0));

        let last_updated = ordered.first().and_then(|(ts, _)| *ts);

        let mut seen: HashSet<&str> = HashSet::new();
        let mut entries = BTreeMap::new();
        for (ts, record) in ordered {
            if !seen.insert(record.metric_name.as_str()) {
                continue;
            }
            let Some(alias) = self.aliases.lookup(&record.metric_name) else {
                tracing::trace!(metric = %record.metric_name, "no public alias, skipped");
                continue;
            };
            entries.insert(
                alias.alias.clone(),
                SnapshotEntry {
                    display: alias.format.render(&record.metric_value, &record.metric_meta),
                    value: record.metric_value.clone(),
                    meta: record.metric_meta.clone(),
                    time_period: record.time_period.clone(),
                    calculated_at: ts,
                    scale: alias.scale.clone(),
                },
            );
        }

        Resolution::Snapshot(MetricSnapshot {
            entries,
            last_updated,
        })
    }
}
