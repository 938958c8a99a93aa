use std::net::SocketAddr;
use std::path::PathBuf;

use echoparse_core::error::{EchoError, Result};
use echoparse_core::metrics::{AliasTable, MetricAlias};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub store: StoreSection,

    #[serde(default)]
    pub snapshot: SnapshotSection,

    #[serde(default)]
    pub live: LiveSection,
}

impl GatewayConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(EchoError::UnsupportedVersion);
        }

        self.server.validate()?;
        self.store.validate()?;
        self.snapshot.validate()?;
        self.live.validate()?;

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr().map(|_| ())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|e| {
            EchoError::BadRequest(format!("server.listen must be a valid SocketAddr: {e}"))
        })
    }
}

fn default_listen() -> String {
    "0.0.0.0:8000".into()
}

/// Where metric rows come from.
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StoreSection {
    Postgres(PostgresStoreConfig),
    /// Rows held in process, optionally seeded from a JSON array on disk.
    Memory(MemoryStoreConfig),
}

impl Default for StoreSection {
    fn default() -> Self {
        StoreSection::Postgres(PostgresStoreConfig::default())
    }
}

impl StoreSection {
    pub fn validate(&self) -> Result<()> {
        match self {
            StoreSection::Postgres(pg) => pg.validate(),
            StoreSection::Memory(_) => Ok(()),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PostgresStoreConfig {
    /// Falls back to the `DATABASE_URL` environment variable.
    #[serde(default)]
    pub database_url: Option<String>,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for PostgresStoreConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            max_connections: default_max_connections(),
        }
    }
}

impl PostgresStoreConfig {
    pub fn validate(&self) -> Result<()> {
        if !(1..=64).contains(&self.max_connections) {
            return Err(EchoError::BadRequest(
                "store.max_connections must be between 1 and 64".into(),
            ));
        }
        Ok(())
    }

    pub fn resolve_url(&self) -> Result<String> {
        self.database_url
            .clone()
            .or_else(|| std::env::var("DATABASE_URL").ok())
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| {
                EchoError::BadRequest("store.database_url or DATABASE_URL must be set".into())
            })
    }
}

fn default_max_connections() -> u32 {
    5
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MemoryStoreConfig {
    #[serde(default)]
    pub seed_file: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SnapshotSection {
    /// Only rows with this `time_period` are read.
    #[serde(default = "default_time_period")]
    pub time_period: String,

    /// Replaces the built-in alias table when present.
    #[serde(default)]
    pub aliases: Option<Vec<MetricAlias>>,
}

impl Default for SnapshotSection {
    fn default() -> Self {
        Self {
            time_period: default_time_period(),
            aliases: None,
        }
    }
}

impl SnapshotSection {
    pub fn validate(&self) -> Result<()> {
        if self.time_period.trim().is_empty() {
            return Err(EchoError::BadRequest(
                "snapshot.time_period must not be empty".into(),
            ));
        }
        self.alias_table().map(|_| ())
    }

    pub fn alias_table(&self) -> Result<AliasTable> {
        match &self.aliases {
            Some(entries) => AliasTable::new(entries.clone()),
            None => Ok(AliasTable::builtin()),
        }
    }
}

fn default_time_period() -> String {
    "30d".into()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LiveSection {
    /// Numeric App Store id. Absent means the app-store rating is always N/A.
    #[serde(default)]
    pub app_store_id: Option<String>,

    /// Play Store package id.
    #[serde(default)]
    pub play_store_id: Option<String>,

    #[serde(default = "default_app_store_lookup_url")]
    pub app_store_lookup_url: String,

    #[serde(default = "default_play_store_details_url")]
    pub play_store_details_url: String,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for LiveSection {
    fn default() -> Self {
        Self {
            app_store_id: None,
            play_store_id: None,
            app_store_lookup_url: default_app_store_lookup_url(),
            play_store_details_url: default_play_store_details_url(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl LiveSection {
    pub fn validate(&self) -> Result<()> {
        if !(100..=60000).contains(&self.timeout_ms) {
            return Err(EchoError::BadRequest(
                "live.timeout_ms must be between 100 and 60000".into(),
            ));
        }
        for (key, url) in [
            ("live.app_store_lookup_url", &self.app_store_lookup_url),
            ("live.play_store_details_url", &self.play_store_details_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(EchoError::BadRequest(format!(
                    "{key} must be an http(s) url"
                )));
            }
        }
        Ok(())
    }
}

fn default_app_store_lookup_url() -> String {
    "https://itunes.apple.com/lookup".into()
}
fn default_play_store_details_url() -> String {
    "https://play.google.com/store/apps/details".into()
}
fn default_timeout_ms() -> u64 {
    10000
}
