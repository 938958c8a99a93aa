//! Gateway config loader (strict parsing).

pub mod schema;

use std::fs;

use echoparse_core::error::{EchoError, Result};

pub use schema::{
    GatewayConfig, LiveSection, MemoryStoreConfig, PostgresStoreConfig, ServerSection,
    SnapshotSection, StoreSection,
};

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "ECHOPARSE_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "echoparse.yaml";

pub fn load_from_env() -> Result<GatewayConfig> {
    let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<GatewayConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| EchoError::Internal(format!("read config failed ({path}): {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<GatewayConfig> {
    let cfg: GatewayConfig = serde_yaml::from_str(s)
        .map_err(|e| EchoError::BadRequest(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
