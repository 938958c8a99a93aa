//! echoparse core: transport-agnostic metric snapshot and live-rating logic.
//!
//! This crate holds the data model shared by the gateway and tests: metric
//! records, the alias table, the latest-per-metric resolver, the live-rating
//! shape, and the payload extractors for the two rating sources. It carries no
//! HTTP or database dependencies so the reduction logic can be tested on plain
//! values.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here. Malformed upstream
//! payloads surface as `None` or `EchoError`, never as a crash.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod metrics;
pub mod rating;

/// Shared result type.
pub use error::{EchoError, Result};
