//! Workflow errors

use super::store::StoreError;
use shared::order::OrderStatus;
use thiserror::Error;

/// Caller-surfaced workflow errors.
///
/// Everything here is recoverable and must reach the caller; only
/// notification and cart-clear failures are swallowed (logged) elsewhere.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Order not found: {0}")]
    NotFound(String),

    #[error("Unknown order status: {0}")]
    InvalidStatus(String),

    #[error("Transition denied: {0}")]
    Validation(String),

    #[error("Order {order_id} already claimed by {holder}")]
    AlreadyClaimed { order_id: String, holder: String },

    #[error("Menu item unavailable: {0}")]
    ItemUnavailable(String),

    #[error("Order {order_id} is in terminal status {status}")]
    TerminalState {
        order_id: String,
        status: OrderStatus,
    },

    #[error("Menu catalog unavailable: {0}")]
    CatalogUnavailable(String),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(#[from] StoreError),
}

pub type WorkflowResult<T> = Result<T, WorkflowError>;
