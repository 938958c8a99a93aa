//! Dashboard endpoints.
//!
//! - `/metrics`      : latest-per-metric snapshot
//! - `/live-ratings` : app-store and play-store ratings fetched on request

pub mod live;
pub mod snapshot;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use echoparse_core::error::{ClientCode, EchoError};

/// Request-level failure. Rendered as `{success: false, error, code}`.
#[derive(Debug)]
pub struct ApiError(pub EchoError);

impl From<EchoError> for ApiError {
    fn from(e: EchoError) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.0.client_code();
        let status = match code {
            ClientCode::BadRequest | ClientCode::UnsupportedVersion => StatusCode::BAD_REQUEST,
            ClientCode::StoreUnavailable
            | ClientCode::UpstreamFailed
            | ClientCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(json!({
            "success": false,
            "error": self.0.to_string(),
            "code": code.as_str(),
        }));
        (status, body).into_response()
    }
}
