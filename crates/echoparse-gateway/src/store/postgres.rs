//! Postgres-backed store reading the `dashboard_metrics` table the ingestion
//! pipeline writes.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::types::Json;
use sqlx::Row;

use echoparse_core::error::{EchoError, Result};
use echoparse_core::metrics::{MetricRecord, MetricValue};

use super::MetricStore;

// metric_value is cast to text so numeric and textual metrics share one path.
const SELECT_METRICS: &str = "\
    SELECT metric_name, \
           metric_value::text AS metric_value, \
           metric_metadata, \
           time_period, \
           calculation_date::timestamptz AS calculation_date \
    FROM dashboard_metrics \
    WHERE time_period = $1";

pub struct PgMetricStore {
    pool: PgPool,
}

impl PgMetricStore {
    /// Build the pool without connecting; the first query opens a connection,
    /// so an unreachable database shows up as a per-request store fault
    /// instead of a boot failure.
    pub fn connect_lazy(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect_lazy(database_url)
            .map_err(|e| EchoError::BadRequest(format!("invalid database url: {e}")))?;
        Ok(Self { pool })
    }
}

fn store_err(e: sqlx::Error) -> EchoError {
    EchoError::Store(e.to_string())
}

fn row_to_record(row: &PgRow) -> Result<MetricRecord> {
    let metric_name: String = row.try_get("metric_name").map_err(store_err)?;
    let value: Option<String> = row.try_get("metric_value").map_err(store_err)?;
    let meta: Option<Json<Value>> = row.try_get("metric_metadata").map_err(store_err)?;
    let time_period: String = row.try_get("time_period").map_err(store_err)?;
    let calculated_at: Option<DateTime<Utc>> =
        row.try_get("calculation_date").map_err(store_err)?;

    Ok(MetricRecord {
        metric_name,
        metric_value: column_value(value.as_deref()),
        metric_meta: column_meta(meta.map(|Json(v)| v)),
        time_period,
        calculated_at,
    })
}

/// NULL reads as an empty text value.
fn column_value(text: Option<&str>) -> MetricValue {
    MetricValue::from_text(text.unwrap_or_default())
}

/// Only a JSON object is kept; NULL, arrays and scalars become an empty map.
fn column_meta(meta: Option<Value>) -> Map<String, Value> {
    match meta {
        Some(Value::Object(m)) => m,
        _ => Map::new(),
    }
}

#[async_trait]
impl MetricStore for PgMetricStore {
    fn kind(&self) -> &'static str {
        "postgres"
    }

    async fn fetch_records(&self, time_period: &str) -> Result<Vec<MetricRecord>> {
        let rows = sqlx::query(SELECT_METRICS)
            .bind(time_period)
            .fetch_all(&self.pool)
            .await
            .map_err(store_err)?;

        tracing::debug!(rows = rows.len(), %time_period, "dashboard_metrics read");
        rows.iter().map(row_to_record).collect()
    }
}
