//! Payment webhook handler

use axum::{Json, extract::State};
use serde::Deserialize;

use shared::order::{Order, PaymentStatus};

use crate::core::ServerState;
use crate::utils::AppResult;

/// Payment provider callback payload
#[derive(Debug, Deserialize)]
pub struct PaymentWebhook {
    pub order_id: String,
    pub status: PaymentStatus,
    /// Provider transaction reference
    #[serde(default)]
    pub provider_ref: Option<String>,
}

/// Consume a payment status callback.
///
/// A PAID callback on a PENDING order also confirms it (system actor),
/// atomically with the payment update.
pub async fn webhook(
    State(state): State<ServerState>,
    Json(payload): Json<PaymentWebhook>,
) -> AppResult<Json<Order>> {
    let order = state
        .workflow
        .update_payment_status(&payload.order_id, payload.status, payload.provider_ref)
        .await?;
    Ok(Json(order))
}
