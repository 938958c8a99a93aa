//! echoparse gateway library entry.
//!
//! Wires config, the metric store, the live-rating sources and the HTTP
//! handlers into one axum service. Consumed by the binary (`main.rs`) and by
//! integration tests.

pub mod api;
pub mod app_state;
pub mod config;
pub mod live;
pub mod obs;
pub mod ops;
pub mod router;
pub mod store;
