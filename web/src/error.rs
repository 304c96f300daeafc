//! HTTP rendering of envelopes and errors.
//!
//! Every response body is a [`ResultEnvelope`]. The status code is derived
//! from the envelope's failure code, so a client can branch on either.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use notebridge_core::{ErrorCode, GatewayError, ResultEnvelope};
use serde::Serialize;
use std::fmt;

/// HTTP status for a failure code.
#[must_use]
pub const fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::CredentialMissing | ErrorCode::PrimitiveFailure => StatusCode::BAD_REQUEST,
        ErrorCode::ValidationError => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorCode::AggregationStalled => StatusCode::BAD_GATEWAY,
        ErrorCode::Cancelled => StatusCode::GATEWAY_TIMEOUT,
        ErrorCode::UnexpectedFault => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// An envelope rendered as an HTTP response.
///
/// Successful envelopes are `200 OK`; failed ones use [`status_for`].
#[derive(Debug, Clone)]
pub struct EnvelopeResponse(pub ResultEnvelope);

impl IntoResponse for EnvelopeResponse {
    fn into_response(self) -> Response {
        let status = self.0.code.map_or(StatusCode::OK, status_for);
        if status.is_server_error() {
            tracing::warn!(
                status = %status,
                code = ?self.0.code,
                message = %self.0.message,
                "operation failed"
            );
        }
        (status, Json(self.0)).into_response()
    }
}

/// Errors raised by the HTTP layer itself, before an operation runs.
///
/// Rendered in envelope shape so clients only ever parse one body format.
#[derive(Debug)]
pub struct AppError {
    /// HTTP status code
    status: StatusCode,
    /// Error message (user-facing)
    message: String,
    /// Error code (for client error handling)
    code: String,
}

impl AppError {
    /// Create a new application error.
    #[must_use]
    pub const fn new(status: StatusCode, message: String, code: String) -> Self {
        Self {
            status,
            message,
            code,
        }
    }

    /// Create a 404 Not Found error.
    #[must_use]
    pub fn not_found(what: impl fmt::Display) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            format!("{what} not found"),
            "NOT_FOUND".to_string(),
        )
    }

    /// Create a 422 error for malformed caller input.
    #[must_use]
    pub fn validation(field: &str, reason: impl Into<String>) -> Self {
        Self::from(GatewayError::validation(field, reason))
    }

    /// HTTP status of this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<GatewayError> for AppError {
    fn from(err: GatewayError) -> Self {
        let code = err.code();
        Self::new(status_for(code), err.to_string(), code.as_str().to_string())
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {}

/// Envelope-shaped error body.
#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    message: String,
    data: Option<()>,
    code: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            success: false,
            message: self.message,
            data: None,
            code: self.code,
        };
        (self.status, Json(body)).into_response()
    }
}
