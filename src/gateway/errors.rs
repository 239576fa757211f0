//! # Gateway Errors
//!
//! Error types for the request-to-statement gateway.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::db::DbError;

/// Result type for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Client-caused input faults, rejected before any statement is built
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedInput {
    /// Request body was not a JSON object
    #[error("request body must be a JSON object")]
    BodyNotObject,

    /// No columns left to write
    #[error("no fields to write")]
    EmptyWriteSet,

    /// Body key outside the resource's writable columns
    #[error("\"{field}\" is not a writable field of {table}")]
    UnknownField { field: String, table: &'static str },

    /// Required column absent on create
    #[error("missing required field \"{column}\"")]
    MissingField { column: &'static str },

    /// Value does not match the declared column kind
    #[error("field \"{column}\" must be a {expected}")]
    TypeMismatch {
        column: &'static str,
        expected: &'static str,
    },

    /// Date-time literal outside the fixed format
    #[error("field \"{column}\" must be a timestamp in YYYY-MM-DD HH:MM:SS form")]
    InvalidTimestamp { column: &'static str },

    /// Path identifier not coercible to an integer key
    #[error("invalid record id: \"{0}\"")]
    InvalidId(String),
}

/// Request-level errors surfaced by gateway operations
#[derive(Debug, Error)]
pub enum GatewayError {
    // ==================
    // Client Errors (4xx)
    // ==================
    /// Input rejected before statement construction
    #[error("{0}")]
    Malformed(#[from] MalformedInput),

    // ==================
    // Server Errors (5xx)
    // ==================
    /// Failure surfaced by the database collaborator. The display text is
    /// deliberately generic; the underlying detail stays in the server log.
    #[error("database operation failed")]
    Database(#[from] DbError),
}

impl GatewayError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::Malformed(_) => StatusCode::BAD_REQUEST,
            GatewayError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl From<GatewayError> for ErrorResponse {
    fn from(err: GatewayError) -> Self {
        Self {
            code: err.status_code().as_u16(),
            error: err.to_string(),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        if let GatewayError::Database(ref db_err) = self {
            error!(error = %db_err, "database operation failed");
        }
        let status = self.status_code();
        let body = Json(ErrorResponse::from(self));
        (status, body).into_response()
    }
}
