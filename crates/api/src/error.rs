use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use questline_core::error::CoreError;
use questline_db::LedgerError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain rejections and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent `{ "error", "code" }`
/// JSON bodies.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level rejection from `questline_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The ledger store failed; the transaction was rolled back.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Rejected(core) => AppError::Core(core),
            LedgerError::Store(db) => AppError::Database(db),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::NotFoundByKey { entity, key } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} '{key}' not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
                CoreError::Locked { .. } => (
                    StatusCode::FORBIDDEN,
                    "TASK_LOCKED",
                    "Task is locked".to_string(),
                ),
                CoreError::InsufficientBalance { .. } => (
                    StatusCode::BAD_REQUEST,
                    "INSUFFICIENT_BALANCE",
                    "Insufficient balance".to_string(),
                ),
                CoreError::OutOfStock { .. } => (
                    StatusCode::BAD_REQUEST,
                    "OUT_OF_STOCK",
                    "Item out of stock".to_string(),
                ),
                CoreError::AlreadyRedeemed { .. } => (
                    StatusCode::CONFLICT,
                    "ALREADY_REDEEMED",
                    "Purchase already redeemed".to_string(),
                ),
            },

            // --- Store errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Everything else is a failed transaction: 503 with a sanitized message.
///   Nothing was written, so the client may retry the request.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        other => {
            tracing::error!(error = %other, "Ledger transaction failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "TRANSACTION_FAILED",
                "The operation could not be completed, please retry".to_string(),
            )
        }
    }
}
