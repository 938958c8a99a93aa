//! Lightweight in-process metrics.
//!
//! Prometheus-compatible text exposition without an exporter crate. Metrics are
//! stored as atomics and rendered by the `/ops/metrics` handler.

pub mod metrics;

pub use metrics::GatewayMetrics;
