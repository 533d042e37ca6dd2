//! Unified error handling
//!
//! Application error type and API response envelope. Domain errors from the
//! workflow layer convert into [`AppError`] so handlers can use `?` and let
//! the [`IntoResponse`] impl pick the HTTP status.
//!
//! # Error code scheme
//!
//! | Code | Category |
//! |------|----------|
//! | E0001 | Database/storage |
//! | E0002 | Validation |
//! | E0003 | Not found |
//! | E0004 | Conflict |
//! | E0005 | Business rule |
//! | E0006 | Invalid request |
//! | E9001 | Internal |

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

use crate::orders::WorkflowError;

/// API response envelope
///
/// ```json
/// {
///   "code": "0000",
///   "message": "success",
///   "data": { ... }
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct AppResponse<T> {
    /// Error code (0000 means success)
    pub code: String,
    /// Message
    pub message: String,
    /// Response data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> AppResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: "0000".to_string(),
            message: "success".to_string(),
            data: Some(data),
        }
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            data: None,
        }
    }
}

/// Application error enumeration
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Resource not found: {0}")]
    /// Missing resource (404)
    NotFound(String),

    #[error("Resource conflict: {0}")]
    /// Conflicting state, e.g. a lost claim race (409)
    Conflict(String),

    #[error("Validation failed: {0}")]
    /// Malformed or incomplete request payload (400)
    Validation(String),

    #[error("Business rule violation: {0}")]
    /// Request is well-formed but the workflow forbids it (422)
    BusinessRule(String),

    #[error("Invalid request: {0}")]
    /// Unrecognized enum value or parameter (400)
    Invalid(String),

    #[error("Database error: {0}")]
    /// Storage failure (500)
    Database(String),

    #[error("Internal server error: {0}")]
    /// Anything else (500)
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "E0003", msg.as_str()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "E0004", msg.as_str()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "E0002", msg.as_str()),
            AppError::BusinessRule(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "E0005", msg.as_str())
            }
            AppError::Invalid(msg) => (StatusCode::BAD_REQUEST, "E0006", msg.as_str()),
            AppError::Database(msg) => {
                error!(error = %msg, "Database error");
                (StatusCode::INTERNAL_SERVER_ERROR, "E0001", "Storage unavailable")
            }
            AppError::Internal(msg) => {
                error!(error = %msg, "Internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "E9001", "Internal server error")
            }
        };

        let body = Json(AppResponse::<()>::error(code, message));
        (status, body).into_response()
    }
}

impl From<WorkflowError> for AppError {
    fn from(err: WorkflowError) -> Self {
        match err {
            WorkflowError::NotFound(msg) => AppError::NotFound(msg),
            WorkflowError::InvalidStatus(status) => {
                AppError::Invalid(format!("unknown order status: {status}"))
            }
            WorkflowError::Validation(msg) => AppError::BusinessRule(msg),
            WorkflowError::AlreadyClaimed { order_id, holder } => AppError::Conflict(format!(
                "order {order_id} is already claimed by {holder}"
            )),
            WorkflowError::ItemUnavailable(item) => {
                AppError::BusinessRule(format!("menu item unavailable: {item}"))
            }
            WorkflowError::TerminalState { order_id, status } => AppError::Conflict(format!(
                "order {order_id} is in terminal status {status}"
            )),
            WorkflowError::CatalogUnavailable(msg) => {
                AppError::Internal(format!("menu catalog unavailable: {msg}"))
            }
            WorkflowError::StorageUnavailable(e) => AppError::Database(e.to_string()),
        }
    }
}
