//! Order API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use validator::Validate;

use shared::order::{ActorRole, ClaimRole, LineItemInput, Order, OrderStatus};

use crate::core::ServerState;
use crate::orders::{CreateOrder, WorkflowError};
use crate::utils::{AppError, AppResult};

/// Create order request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateOrderRequest {
    pub customer_id: String,
    #[serde(default)]
    pub table_id: Option<String>,
    #[validate(length(min = 1, message = "order must contain at least one item"))]
    pub items: Vec<LineItemInput>,
    pub payment_method: String,
}

/// Create an order from a cart snapshot
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CreateOrderRequest>,
) -> AppResult<Json<Order>> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let order = state
        .workflow
        .create_order(CreateOrder {
            customer_id: payload.customer_id,
            table_id: payload.table_id,
            items: payload.items,
            payment_method: payload.payment_method,
        })
        .await?;
    Ok(Json(order))
}

/// Get order by id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let order = state.workflow.get_order(&id)?;
    Ok(Json(order))
}

/// Customer order history, newest first
pub async fn list_for_customer(
    State(state): State<ServerState>,
    Path(customer_id): Path<String>,
) -> AppResult<Json<Vec<Order>>> {
    let orders = state.workflow.orders_for_customer(&customer_id)?;
    Ok(Json(orders))
}

/// Orders assigned to a staff member
pub async fn list_for_staff(
    State(state): State<ServerState>,
    Path(staff_id): Path<String>,
) -> AppResult<Json<Vec<Order>>> {
    let orders = state.workflow.orders_for_staff(&staff_id)?;
    Ok(Json(orders))
}

/// Active orders for the kitchen display
pub async fn kitchen_orders(State(state): State<ServerState>) -> AppResult<Json<Vec<Order>>> {
    let orders = state.workflow.kitchen_orders()?;
    Ok(Json(orders))
}

/// Unclaimed orders a chef or waiter could pick up
pub async fn claimable(
    State(state): State<ServerState>,
    Path(role): Path<String>,
) -> AppResult<Json<Vec<Order>>> {
    let role = parse_claim_role(&role)?;
    let orders = state.workflow.claimable_orders(role)?;
    Ok(Json(orders))
}

/// Status change request
#[derive(Debug, Deserialize)]
pub struct ChangeStatusRequest {
    pub status: String,
    pub actor_id: String,
    pub role: ActorRole,
    #[serde(default)]
    pub note: Option<String>,
}

/// Role-validated status transition
pub async fn change_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ChangeStatusRequest>,
) -> AppResult<Json<Order>> {
    let requested = OrderStatus::parse(&payload.status)
        .map_err(|e| AppError::from(WorkflowError::InvalidStatus(e.0)))?;

    let order = state
        .workflow
        .change_status(&id, requested, &payload.actor_id, payload.role, payload.note)
        .await?;
    Ok(Json(order))
}

/// Cancel request
#[derive(Debug, Deserialize)]
pub struct CancelRequest {
    pub actor_id: String,
    pub role: ActorRole,
    pub reason: String,
}

/// Cancel an order (only while PENDING or CONFIRMED)
pub async fn cancel(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<CancelRequest>,
) -> AppResult<Json<()>> {
    state
        .workflow
        .cancel_order(&id, &payload.actor_id, payload.role, &payload.reason)
        .await?;
    Ok(Json(()))
}

/// Claim request
#[derive(Debug, Deserialize)]
pub struct ClaimRequest {
    pub role: ClaimRole,
    pub actor_id: String,
}

/// Claim a role slot; exactly one of two racing claimants wins
pub async fn claim(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ClaimRequest>,
) -> AppResult<Json<Order>> {
    let order = state
        .workflow
        .claim(&id, payload.role, &payload.actor_id)
        .await?;
    Ok(Json(order))
}

/// Release request
#[derive(Debug, Deserialize)]
pub struct ReleaseRequest {
    pub role: ClaimRole,
    pub actor_id: String,
    pub actor_role: ActorRole,
}

/// Release a claim without finalizing (holder or admin)
pub async fn release(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ReleaseRequest>,
) -> AppResult<Json<Order>> {
    let order = state
        .workflow
        .release(&id, payload.role, &payload.actor_id, payload.actor_role)
        .await?;
    Ok(Json(order))
}

/// Mark-ready request
#[derive(Debug, Deserialize)]
pub struct MarkReadyRequest {
    pub chef_id: String,
}

/// Chef finalize: PREPARING → READY, chef slot released
pub async fn mark_ready(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<MarkReadyRequest>,
) -> AppResult<Json<Order>> {
    let order = state.workflow.mark_ready(&id, &payload.chef_id).await?;
    Ok(Json(order))
}

/// Complete-service request
#[derive(Debug, Deserialize)]
pub struct CompleteServiceRequest {
    pub waiter_id: String,
}

/// Waiter finalize: SERVED → COMPLETED, waiter slot released
pub async fn complete_service(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<CompleteServiceRequest>,
) -> AppResult<Json<Order>> {
    let order = state
        .workflow
        .complete_service(&id, &payload.waiter_id)
        .await?;
    Ok(Json(order))
}

/// Force-assign request (admin override)
#[derive(Debug, Deserialize)]
pub struct ForceAssignRequest {
    pub role: ClaimRole,
    pub staff_id: String,
    pub admin_id: String,
}

/// Admin emergency override of a claim slot
pub async fn force_assign(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ForceAssignRequest>,
) -> AppResult<Json<Order>> {
    let order = state
        .workflow
        .force_assign(&id, payload.role, &payload.staff_id, &payload.admin_id)
        .await?;
    Ok(Json(order))
}

fn parse_claim_role(role: &str) -> AppResult<ClaimRole> {
    ClaimRole::parse(role).ok_or_else(|| AppError::Invalid(format!("unknown claim role: {role}")))
}
