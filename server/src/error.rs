//! API error responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use cbrates_fx::FxError;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

/// JSON body of an error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: &'static str,
    pub message: String,
}

/// Error returned by a handler.
#[derive(Debug, Error)]
#[error("API error {code}: {message}")]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

impl ApiError {
    /// The request body could not be read or decoded.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: "BAD_REQUEST",
            message: message.into(),
        }
    }
}

/// Every rate engine failure is reported as a bad gateway.
impl From<FxError> for ApiError {
    fn from(err: FxError) -> Self {
        Self {
            status: StatusCode::BAD_GATEWAY,
            code: err.error_code(),
            message: format!("failed to process the request: {err}"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, code = self.code, message = %self.message, "Request failed");
        } else {
            warn!(status = %self.status, code = self.code, message = %self.message, "Request rejected");
        }

        let body = Json(ErrorResponse {
            code: self.code,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}
