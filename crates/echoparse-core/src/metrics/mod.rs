//! Stored dashboard metrics and their reduction to a snapshot.
//!
//! - `record`: rows as persisted by the ingestion pipeline.
//! - `alias`: static internal-name -> public-key table with display formats.
//! - `snapshot`: latest-per-metric resolver and its response envelope.

pub mod alias;
pub mod record;
pub mod snapshot;

pub use alias::{AliasTable, DisplayFormat, MetricAlias};
pub use record::{MetricRecord, MetricValue};
pub use snapshot::{MetricSnapshot, Resolution, SnapshotEntry, SnapshotResolver, SnapshotResponse};
