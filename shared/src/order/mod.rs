//! Order domain types
//!
//! - **order**: the `Order` aggregate root with status, claim slots and
//!   append-only history
//! - **types**: role enums, payment lifecycle, creation inputs
//! - **event**: notification events broadcast after committed mutations

pub mod event;
pub mod order;
pub mod types;

// Re-exports
pub use event::{OrderEvent, OrderEventType};
pub use order::{ClaimRecord, HistoryEntry, ItemModifier, Order, OrderItem, OrderStatus, UnknownStatus};
pub use types::{ActorRole, ClaimRole, LineItemInput, PaymentStatus};
