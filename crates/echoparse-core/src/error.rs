//! Shared error type across echoparse crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Invalid input / malformed config.
    BadRequest,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Metric store unreachable or query rejected.
    StoreUnavailable,
    /// External rating source failed or returned junk.
    UpstreamFailed,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ClientCode::StoreUnavailable => "STORE_UNAVAILABLE",
            ClientCode::UpstreamFailed => "UPSTREAM_FAILED",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, EchoError>;

/// Unified error type used by core and gateway.
#[derive(Debug, Error)]
pub enum EchoError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("store access failed: {0}")]
    Store(String),
    #[error("upstream {source_name} failed: {reason}")]
    Upstream {
        source_name: &'static str,
        reason: String,
    },
    #[error("internal: {0}")]
    Internal(String),
}

impl EchoError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            EchoError::BadRequest(_) => ClientCode::BadRequest,
            EchoError::UnsupportedVersion => ClientCode::UnsupportedVersion,
            EchoError::Store(_) => ClientCode::StoreUnavailable,
            EchoError::Upstream { .. } => ClientCode::UpstreamFailed,
            EchoError::Internal(_) => ClientCode::Internal,
        }
    }

    /// Shorthand for an upstream failure of a named rating source.
    pub fn upstream(source_name: &'static str, reason: impl Into<String>) -> Self {
        EchoError::Upstream {
            source_name,
            reason: reason.into(),
        }
    }
}
