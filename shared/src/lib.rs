//! Shared domain types for the order workflow backend
//!
//! Common types used by the server and its clients: the `Order` aggregate,
//! status and role enums, claim records, and notification event types.

pub mod order;
pub mod util;

// Re-exports
pub use order::{
    ActorRole, ClaimRecord, ClaimRole, HistoryEntry, ItemModifier, LineItemInput, Order,
    OrderEvent, OrderEventType, OrderItem, OrderStatus, PaymentStatus,
};
