//! Role enums, payment lifecycle and creation inputs

use serde::{Deserialize, Serialize};

/// Payment lifecycle, independent of the order status.
///
/// Updated only through the payment collaborator's webhook callbacks; the
/// workflow never calls out to the payment provider itself.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Refunded,
    Failed,
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::Pending => write!(f, "PENDING"),
            PaymentStatus::Paid => write!(f, "PAID"),
            PaymentStatus::Refunded => write!(f, "REFUNDED"),
            PaymentStatus::Failed => write!(f, "FAILED"),
        }
    }
}

/// Actor role, supplied per-request by the identity collaborator.
///
/// The workflow trusts this input and performs no authentication.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActorRole {
    Admin,
    Chef,
    Waiter,
    Customer,
}

/// Staff claim slot selector.
///
/// Each order carries one chef slot and one waiter slot; a claim locks
/// exactly one of them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClaimRole {
    Chef,
    Waiter,
}

impl ClaimRole {
    /// Parse a path/query segment, case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "chef" => Some(ClaimRole::Chef),
            "waiter" => Some(ClaimRole::Waiter),
            _ => None,
        }
    }
}

impl std::fmt::Display for ClaimRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClaimRole::Chef => write!(f, "chef"),
            ClaimRole::Waiter => write!(f, "waiter"),
        }
    }
}

/// Line item input for order creation.
///
/// Prices are never taken from the client; the workflow resolves them
/// through the menu catalog at creation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItemInput {
    /// Menu item ID
    pub menu_item_id: String,
    /// Quantity
    pub quantity: i32,
    /// Selected modifier IDs (must exist on the menu item)
    #[serde(default)]
    pub modifier_ids: Vec<String>,
    /// Per-item note
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}
