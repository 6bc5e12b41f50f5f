//! API error types with HTTP response mapping.

use aggregator::AggregatorError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use ledger::LedgerError;
use orchestrator::SyncError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found.
    NotFound(String),
    /// Bad request from the client (includes unknown channel names, which
    /// are caller errors and never swallowed).
    BadRequest(String),
    /// Ledger error.
    Ledger(LedgerError),
    /// Sync orchestration error.
    Sync(SyncError),
    /// Internal server error.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Ledger(err) => ledger_error_to_response(err),
            ApiError::Sync(err) => sync_error_to_response(err),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

fn ledger_error_to_response(err: LedgerError) -> (StatusCode, String) {
    match &err {
        LedgerError::ProductNotFound(_) => (StatusCode::NOT_FOUND, err.to_string()),
        LedgerError::Database(_) | LedgerError::Migration(_) => {
            tracing::error!(error = %err, "ledger storage error");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

fn sync_error_to_response(err: SyncError) -> (StatusCode, String) {
    match &err {
        SyncError::Ledger(inner) => match inner {
            LedgerError::ProductNotFound(_) => (StatusCode::NOT_FOUND, err.to_string()),
            _ => {
                tracing::error!(error = %err, "ledger storage error");
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
        },
        SyncError::Aggregator(AggregatorError::UnknownChannel(_)) => {
            (StatusCode::BAD_REQUEST, err.to_string())
        }
        SyncError::Aggregator(AggregatorError::Channel(_)) => {
            (StatusCode::BAD_GATEWAY, err.to_string())
        }
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        ApiError::Ledger(err)
    }
}

impl From<SyncError> for ApiError {
    fn from(err: SyncError) -> Self {
        ApiError::Sync(err)
    }
}

impl From<AggregatorError> for ApiError {
    fn from(err: AggregatorError) -> Self {
        ApiError::Sync(SyncError::Aggregator(err))
    }
}
