//! Order aggregate - the single shared mutable resource of the workflow
//!
//! An order is created from a cart snapshot and then mutated only through
//! validated status transitions and claim operations. It is never deleted;
//! it only reaches a terminal status.

use super::types::{ClaimRole, PaymentStatus};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Order status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Preparing,
    Ready,
    Served,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// Terminal statuses admit no further transition, for any role.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    /// Parse a wire-format status (SCREAMING_SNAKE_CASE).
    pub fn parse(s: &str) -> Result<Self, UnknownStatus> {
        match s {
            "PENDING" => Ok(OrderStatus::Pending),
            "CONFIRMED" => Ok(OrderStatus::Confirmed),
            "PREPARING" => Ok(OrderStatus::Preparing),
            "READY" => Ok(OrderStatus::Ready),
            "SERVED" => Ok(OrderStatus::Served),
            "COMPLETED" => Ok(OrderStatus::Completed),
            "CANCELLED" => Ok(OrderStatus::Cancelled),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "PENDING"),
            OrderStatus::Confirmed => write!(f, "CONFIRMED"),
            OrderStatus::Preparing => write!(f, "PREPARING"),
            OrderStatus::Ready => write!(f, "READY"),
            OrderStatus::Served => write!(f, "SERVED"),
            OrderStatus::Completed => write!(f, "COMPLETED"),
            OrderStatus::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

/// Status string outside the recognized set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown order status: {0}")]
pub struct UnknownStatus(pub String);

/// Role-scoped claim slot state.
///
/// Kept separate from the `assigned_*` fields: a released slot goes
/// inactive but the assignment is retained for audit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClaimRecord {
    pub claimant_id: String,
    pub claimed_at: i64,
    pub active: bool,
}

/// Append-only status history entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryEntry {
    pub status: OrderStatus,
    pub actor_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub timestamp: i64,
}

/// Modifier snapshot on an order line (name and price frozen at creation).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemModifier {
    pub modifier_id: String,
    pub name: String,
    pub price_adjustment: Decimal,
}

/// Order line item, immutable once the order exists.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    pub menu_item_id: String,
    /// Name snapshot at creation time
    pub name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    #[serde(default)]
    pub modifiers: Vec<ItemModifier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl OrderItem {
    /// Line total: (unit price + modifier adjustments) × quantity.
    pub fn line_total(&self) -> Decimal {
        let adjustments: Decimal = self.modifiers.iter().map(|m| m.price_adjustment).sum();
        (self.unit_price + adjustments) * Decimal::from(self.quantity)
    }
}

/// Order aggregate root.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    /// Opaque unique ID, assigned at creation
    pub id: String,
    pub status: OrderStatus,
    /// Owning customer, immutable after creation
    pub customer_id: String,
    /// Physical table context; absent for non-dine-in orders
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_id: Option<String>,
    pub items: Vec<OrderItem>,
    /// Sum of line totals, fixed at creation (2-digit currency precision)
    pub total_amount: Decimal,
    pub payment_method: String,
    pub payment_status: PaymentStatus,
    /// Payment provider transaction reference
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_ref: Option<String>,
    /// Retained after slot release for audit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_chef: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_waiter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chef_claim: Option<ClaimRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waiter_claim: Option<ClaimRecord>,
    /// Never empty, never mutated; last entry's status equals `status`
    pub status_history: Vec<HistoryEntry>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Order {
    /// Create a new order from resolved line items.
    ///
    /// Status starts at `PENDING` with the creating customer as the first
    /// history actor; the total is computed once and never changes.
    pub fn new(
        id: String,
        customer_id: String,
        table_id: Option<String>,
        items: Vec<OrderItem>,
        payment_method: String,
        now: i64,
    ) -> Self {
        let total_amount = Self::total_of(&items);
        let first_entry = HistoryEntry {
            status: OrderStatus::Pending,
            actor_id: customer_id.clone(),
            note: Some("Order created".to_string()),
            timestamp: now,
        };
        Self {
            id,
            status: OrderStatus::Pending,
            customer_id,
            table_id,
            items,
            total_amount,
            payment_method,
            payment_status: PaymentStatus::Pending,
            payment_ref: None,
            assigned_chef: None,
            assigned_waiter: None,
            chef_claim: None,
            waiter_claim: None,
            status_history: vec![first_entry],
            created_at: now,
            updated_at: now,
        }
    }

    /// Sum of line totals rounded to currency precision.
    pub fn total_of(items: &[OrderItem]) -> Decimal {
        items
            .iter()
            .map(OrderItem::line_total)
            .sum::<Decimal>()
            .round_dp(2)
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Claim slot for a role.
    pub fn claim(&self, role: ClaimRole) -> Option<&ClaimRecord> {
        match role {
            ClaimRole::Chef => self.chef_claim.as_ref(),
            ClaimRole::Waiter => self.waiter_claim.as_ref(),
        }
    }

    /// Current active claimant of a slot, if any.
    pub fn active_claimant(&self, role: ClaimRole) -> Option<&str> {
        self.claim(role)
            .filter(|c| c.active)
            .map(|c| c.claimant_id.as_str())
    }

    /// Assigned staff reference for a role.
    pub fn assigned(&self, role: ClaimRole) -> Option<&str> {
        match role {
            ClaimRole::Chef => self.assigned_chef.as_deref(),
            ClaimRole::Waiter => self.assigned_waiter.as_deref(),
        }
    }

    pub fn set_claim(&mut self, role: ClaimRole, record: ClaimRecord) {
        match role {
            ClaimRole::Chef => self.chef_claim = Some(record),
            ClaimRole::Waiter => self.waiter_claim = Some(record),
        }
    }

    /// Deactivate a slot, retaining claimant and assignment for audit.
    pub fn release_claim(&mut self, role: ClaimRole) {
        let slot = match role {
            ClaimRole::Chef => self.chef_claim.as_mut(),
            ClaimRole::Waiter => self.waiter_claim.as_mut(),
        };
        if let Some(claim) = slot {
            claim.active = false;
        }
    }

    pub fn set_assigned(&mut self, role: ClaimRole, actor_id: &str) {
        match role {
            ClaimRole::Chef => self.assigned_chef = Some(actor_id.to_string()),
            ClaimRole::Waiter => self.assigned_waiter = Some(actor_id.to_string()),
        }
    }

    /// Apply a status change and append the matching history entry.
    ///
    /// The only mutation path for `status`; keeps the last-history-entry
    /// invariant by construction.
    pub fn record_status(&mut self, status: OrderStatus, actor_id: &str, note: Option<String>, now: i64) {
        self.status = status;
        self.status_history.push(HistoryEntry {
            status,
            actor_id: actor_id.to_string(),
            note,
            timestamp: now,
        });
        self.updated_at = now;
    }

    /// Refresh `updated_at` for mutations that do not change status.
    pub fn touch(&mut self, now: i64) {
        self.updated_at = now;
    }
}
