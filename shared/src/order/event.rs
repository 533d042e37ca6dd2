//! Notification events - broadcast after committed order mutations
//!
//! Events are informational fan-out records, not the source of truth; the
//! persisted order is. Delivery is fire-and-forget per audience.

use super::order::{Order, OrderStatus};
use super::types::PaymentStatus;
use crate::util::{event_id, now_millis};
use serde::{Deserialize, Serialize};

/// Event type enumeration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderEventType {
    OrderCreated,
    StatusChanged,
    OrderClaimed,
    ClaimReleased,
    OrderForceAssigned,
    PaymentUpdated,
    OrderCancelled,
}

impl std::fmt::Display for OrderEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderEventType::OrderCreated => write!(f, "ORDER_CREATED"),
            OrderEventType::StatusChanged => write!(f, "STATUS_CHANGED"),
            OrderEventType::OrderClaimed => write!(f, "ORDER_CLAIMED"),
            OrderEventType::ClaimReleased => write!(f, "CLAIM_RELEASED"),
            OrderEventType::OrderForceAssigned => write!(f, "ORDER_FORCE_ASSIGNED"),
            OrderEventType::PaymentUpdated => write!(f, "PAYMENT_UPDATED"),
            OrderEventType::OrderCancelled => write!(f, "ORDER_CANCELLED"),
        }
    }
}

/// Order update notification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderEvent {
    /// Event unique ID
    pub event_id: String,
    /// Order this event belongs to
    pub order_id: String,
    /// Owning customer (audience resolution)
    pub customer_id: String,
    /// Table context, if any (audience resolution)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_id: Option<String>,
    pub event_type: OrderEventType,
    /// Order status after the mutation
    pub status: OrderStatus,
    /// Payment status after the mutation
    pub payment_status: PaymentStatus,
    /// Human-readable summary
    pub message: String,
    /// Actor that triggered the mutation, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor_id: Option<String>,
    /// Server timestamp (Unix milliseconds)
    pub timestamp: i64,
}

impl OrderEvent {
    /// Build an event from the committed order state.
    pub fn new(
        order: &Order,
        event_type: OrderEventType,
        message: impl Into<String>,
        actor_id: Option<&str>,
    ) -> Self {
        Self {
            event_id: event_id(),
            order_id: order.id.clone(),
            customer_id: order.customer_id.clone(),
            table_id: order.table_id.clone(),
            event_type,
            status: order.status,
            payment_status: order.payment_status,
            message: message.into(),
            actor_id: actor_id.map(str::to_string),
            timestamp: now_millis(),
        }
    }
}
