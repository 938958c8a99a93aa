//! Top-level facade crate for echoparse.
//!
//! Re-exports the core model and the gateway library so users can depend on a single crate.

pub mod core {
    pub use echoparse_core::*;
}

pub mod gateway {
    pub use echoparse_gateway::*;
}
