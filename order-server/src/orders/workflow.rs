//! Order workflow service
//!
//! Composition root of the order subsystem. Every mutation follows the same
//! shape:
//!
//! ```text
//! begin write transaction
//!     ├─ load the order (fresh read)
//!     ├─ validate (transition table / claim preconditions)
//!     ├─ mutate + append history
//!     ├─ persist, update active index
//! commit
//!     └─ notification fan-out (fire-and-forget)
//! ```
//!
//! Validation happens against the read taken inside the transaction, so a
//! mutation that lost a race observes the winner's committed state and is
//! denied; nothing is persisted for rejected requests, including history.

use std::sync::Arc;

use shared::order::{
    ActorRole, ClaimRole, ItemModifier, LineItemInput, Order, OrderEventType, OrderItem,
    OrderStatus, PaymentStatus,
};
use shared::util::{now_millis, order_id};

use crate::notify::Notifier;
use crate::services::{CartService, MenuCatalog};

use super::claims::{self, ClaimOutcome};
use super::error::{WorkflowError, WorkflowResult};
use super::store::{OrderStore, StoreError};
use super::transition::{self, Denied, Transition};

/// Actor recorded for automatic transitions (payment-triggered confirm).
const SYSTEM_ACTOR: &str = "system";

/// Order creation input: a cart snapshot plus customer/table context.
#[derive(Debug, Clone)]
pub struct CreateOrder {
    pub customer_id: String,
    pub table_id: Option<String>,
    pub items: Vec<LineItemInput>,
    pub payment_method: String,
}

/// Orchestrates validator, claim manager, store and fan-out.
///
/// All collaborators are injected; the service holds no ambient state.
pub struct OrderWorkflow {
    store: OrderStore,
    catalog: Arc<dyn MenuCatalog>,
    cart: Arc<dyn CartService>,
    notifier: Notifier,
}

impl OrderWorkflow {
    pub fn new(
        store: OrderStore,
        catalog: Arc<dyn MenuCatalog>,
        cart: Arc<dyn CartService>,
        notifier: Notifier,
    ) -> Self {
        Self {
            store,
            catalog,
            cart,
            notifier,
        }
    }

    // ========== Creation ==========

    /// Create an order from a cart snapshot.
    ///
    /// Prices come from the catalog, never from the client. A cart-clear
    /// failure is logged and does not fail the creation.
    pub async fn create_order(&self, input: CreateOrder) -> WorkflowResult<Order> {
        if input.items.is_empty() {
            return Err(WorkflowError::Validation(
                "order must contain at least one item".to_string(),
            ));
        }

        let mut items = Vec::with_capacity(input.items.len());
        for line in &input.items {
            items.push(self.resolve_line_item(line).await?);
        }

        let order = Order::new(
            order_id(),
            input.customer_id,
            input.table_id,
            items,
            input.payment_method,
            now_millis(),
        );

        let txn = self.store.begin_write()?;
        self.store.store_order(&txn, &order)?;
        self.store.mark_order_active(&txn, &order.id)?;
        txn.commit().map_err(StoreError::from)?;

        tracing::info!(
            order_id = %order.id,
            customer = %order.customer_id,
            total = %order.total_amount,
            "Order created"
        );

        if let Err(e) = self
            .cart
            .clear_cart(&order.customer_id, order.table_id.as_deref())
            .await
        {
            tracing::warn!(order_id = %order.id, error = %e, "Cart clear failed after order creation");
        }

        self.notifier
            .publish(&order, OrderEventType::OrderCreated, "New order created", None)
            .await;
        Ok(order)
    }

    async fn resolve_line_item(&self, line: &LineItemInput) -> WorkflowResult<OrderItem> {
        if line.quantity <= 0 {
            return Err(WorkflowError::Validation(format!(
                "quantity for menu item {} must be positive",
                line.menu_item_id
            )));
        }

        let info = self
            .catalog
            .get_item(&line.menu_item_id)
            .await
            .map_err(|e| WorkflowError::CatalogUnavailable(e.to_string()))?
            .ok_or_else(|| WorkflowError::NotFound(format!("menu item {}", line.menu_item_id)))?;

        if !info.available {
            return Err(WorkflowError::ItemUnavailable(info.id));
        }

        let mut modifiers = Vec::with_capacity(line.modifier_ids.len());
        for modifier_id in &line.modifier_ids {
            let modifier = info
                .modifiers
                .iter()
                .find(|m| &m.id == modifier_id)
                .ok_or_else(|| {
                    WorkflowError::NotFound(format!(
                        "modifier {} on menu item {}",
                        modifier_id, info.id
                    ))
                })?;
            modifiers.push(ItemModifier {
                modifier_id: modifier.id.clone(),
                name: modifier.name.clone(),
                price_adjustment: modifier.price_adjustment,
            });
        }

        Ok(OrderItem {
            menu_item_id: info.id,
            name: info.name,
            quantity: line.quantity,
            unit_price: info.price,
            modifiers,
            note: line.note.clone(),
        })
    }

    // ========== Status Transitions ==========

    /// Apply a role-validated status transition.
    ///
    /// A request where the order already holds the requested status is an
    /// idempotent success: nothing is persisted and no event goes out.
    pub async fn change_status(
        &self,
        order_id: &str,
        requested: OrderStatus,
        actor_id: &str,
        role: ActorRole,
        note: Option<String>,
    ) -> WorkflowResult<Order> {
        let txn = self.store.begin_write()?;
        let mut order = self.load(&txn, order_id)?;

        match transition::can_transition(order.status, requested, role) {
            Err(denied) => return Err(deny(order_id, denied)),
            Ok(Transition::Noop) => return Ok(order),
            Ok(Transition::Apply) => {}
        }

        let now = now_millis();
        order.record_status(requested, actor_id, note, now);
        self.track_assignment(&mut order, requested, actor_id, role);

        self.store.store_order(&txn, &order)?;
        if order.is_terminal() {
            self.store.mark_order_inactive(&txn, &order.id)?;
        }
        txn.commit().map_err(StoreError::from)?;

        tracing::info!(order_id = %order.id, status = %order.status, actor = actor_id, "Order status updated");
        self.notifier
            .publish(
                &order,
                OrderEventType::StatusChanged,
                format!("Order status updated to {}", order.status),
                Some(actor_id),
            )
            .await;
        Ok(order)
    }

    /// Keep assignments in step with status changes that imply ownership
    /// when the slot machinery was bypassed (e.g. admin moves).
    fn track_assignment(
        &self,
        order: &mut Order,
        status: OrderStatus,
        actor_id: &str,
        role: ActorRole,
    ) {
        match (status, role) {
            (OrderStatus::Preparing, ActorRole::Chef) if order.assigned_chef.is_none() => {
                order.set_assigned(ClaimRole::Chef, actor_id);
            }
            (OrderStatus::Served | OrderStatus::Completed, ActorRole::Waiter)
                if order.assigned_waiter.is_none() =>
            {
                order.set_assigned(ClaimRole::Waiter, actor_id);
            }
            _ => {}
        }
    }

    // ========== Claims ==========

    /// Claim a role slot and advance the order in one atomic step.
    ///
    /// Exactly one of two racing claimants wins; the loser gets
    /// [`WorkflowError::AlreadyClaimed`] naming the winner. A repeat claim
    /// by the current holder succeeds without side effects.
    pub async fn claim(
        &self,
        order_id: &str,
        role: ClaimRole,
        actor_id: &str,
    ) -> WorkflowResult<Order> {
        let txn = self.store.begin_write()?;
        let mut order = self.load(&txn, order_id)?;

        match claims::try_claim(&mut order, role, actor_id, now_millis())? {
            ClaimOutcome::AlreadyHeldByCaller => Ok(order),
            ClaimOutcome::Claimed => {
                self.store.store_order(&txn, &order)?;
                txn.commit().map_err(StoreError::from)?;

                tracing::info!(order_id = %order.id, slot = %role, claimant = actor_id, "Order claimed");
                self.notifier
                    .publish(
                        &order,
                        OrderEventType::OrderClaimed,
                        format!("Order claimed by {role} {actor_id}"),
                        Some(actor_id),
                    )
                    .await;
                Ok(order)
            }
        }
    }

    /// Release a claim without finalizing; holder or admin only.
    pub async fn release(
        &self,
        order_id: &str,
        role: ClaimRole,
        actor_id: &str,
        actor_role: ActorRole,
    ) -> WorkflowResult<Order> {
        let txn = self.store.begin_write()?;
        let mut order = self.load(&txn, order_id)?;

        claims::release_slot(
            &mut order,
            role,
            actor_id,
            actor_role == ActorRole::Admin,
            now_millis(),
        )?;

        self.store.store_order(&txn, &order)?;
        txn.commit().map_err(StoreError::from)?;

        tracing::info!(order_id = %order.id, slot = %role, actor = actor_id, "Claim released");
        self.notifier
            .publish(
                &order,
                OrderEventType::ClaimReleased,
                format!("{role} claim released"),
                Some(actor_id),
            )
            .await;
        Ok(order)
    }

    /// Chef finalize: mark the claimed order ready and release the slot.
    pub async fn mark_ready(&self, order_id: &str, chef_id: &str) -> WorkflowResult<Order> {
        self.finalize(order_id, ClaimRole::Chef, chef_id, "Order marked ready")
            .await
    }

    /// Waiter finalize: complete service and release the slot.
    pub async fn complete_service(&self, order_id: &str, waiter_id: &str) -> WorkflowResult<Order> {
        self.finalize(order_id, ClaimRole::Waiter, waiter_id, "Order completed")
            .await
    }

    async fn finalize(
        &self,
        order_id: &str,
        role: ClaimRole,
        actor_id: &str,
        message: &str,
    ) -> WorkflowResult<Order> {
        let txn = self.store.begin_write()?;
        let mut order = self.load(&txn, order_id)?;

        claims::finalize_stage(&mut order, role, actor_id, now_millis())?;

        self.store.store_order(&txn, &order)?;
        if order.is_terminal() {
            self.store.mark_order_inactive(&txn, &order.id)?;
        }
        txn.commit().map_err(StoreError::from)?;

        tracing::info!(order_id = %order.id, status = %order.status, actor = actor_id, "Stage finalized");
        self.notifier
            .publish(&order, OrderEventType::StatusChanged, message, Some(actor_id))
            .await;
        Ok(order)
    }

    /// Admin emergency override: reassign a slot regardless of the current
    /// claim. Logged distinctly from a normal claim.
    pub async fn force_assign(
        &self,
        order_id: &str,
        role: ClaimRole,
        staff_id: &str,
        admin_id: &str,
    ) -> WorkflowResult<Order> {
        let txn = self.store.begin_write()?;
        let mut order = self.load(&txn, order_id)?;

        let previous = order.active_claimant(role).map(str::to_string);
        claims::force_claim(&mut order, role, staff_id, admin_id, now_millis())?;

        self.store.store_order(&txn, &order)?;
        txn.commit().map_err(StoreError::from)?;

        tracing::warn!(
            order_id = %order.id,
            slot = %role,
            new_claimant = staff_id,
            previous_claimant = ?previous,
            admin = admin_id,
            "Claim force-assigned by admin"
        );
        self.notifier
            .publish(
                &order,
                OrderEventType::OrderForceAssigned,
                format!("Order force-assigned to {role} {staff_id}"),
                Some(admin_id),
            )
            .await;
        Ok(order)
    }

    // ========== Payment ==========

    /// Consume a payment-provider callback.
    ///
    /// Independent of the role table; a `PAID` callback on a `PENDING`
    /// order also performs the automatic `PENDING → CONFIRMED` transition
    /// in the same atomic update.
    pub async fn update_payment_status(
        &self,
        order_id: &str,
        new_status: PaymentStatus,
        provider_ref: Option<String>,
    ) -> WorkflowResult<Order> {
        let txn = self.store.begin_write()?;
        let mut order = self.load(&txn, order_id)?;

        let now = now_millis();
        order.payment_status = new_status;
        if let Some(reference) = provider_ref {
            order.payment_ref = Some(reference);
        }

        if new_status == PaymentStatus::Paid && order.status == OrderStatus::Pending {
            order.record_status(
                OrderStatus::Confirmed,
                SYSTEM_ACTOR,
                Some("Payment confirmed".to_string()),
                now,
            );
        } else {
            order.touch(now);
        }

        self.store.store_order(&txn, &order)?;
        txn.commit().map_err(StoreError::from)?;

        tracing::info!(order_id = %order.id, payment_status = %order.payment_status, "Payment status updated");
        self.notifier
            .publish(
                &order,
                OrderEventType::PaymentUpdated,
                format!("Payment status updated to {}", order.payment_status),
                None,
            )
            .await;
        Ok(order)
    }

    // ========== Cancellation ==========

    /// Cancel an order; permitted only while `PENDING` or `CONFIRMED`.
    ///
    /// Payment status becomes `REFUNDED`; actual refund issuance is the
    /// payment collaborator's job.
    pub async fn cancel_order(
        &self,
        order_id: &str,
        actor_id: &str,
        role: ActorRole,
        reason: &str,
    ) -> WorkflowResult<()> {
        let txn = self.store.begin_write()?;
        let mut order = self.load(&txn, order_id)?;

        if let Err(denied) =
            transition::can_transition(order.status, OrderStatus::Cancelled, role)
        {
            return Err(deny(order_id, denied));
        }
        if !matches!(order.status, OrderStatus::Pending | OrderStatus::Confirmed) {
            return Err(WorkflowError::Validation(format!(
                "cannot cancel order {} in status {}",
                order.id, order.status
            )));
        }

        let now = now_millis();
        order.payment_status = PaymentStatus::Refunded;
        order.record_status(
            OrderStatus::Cancelled,
            actor_id,
            Some(format!("Order cancelled: {reason}")),
            now,
        );

        self.store.store_order(&txn, &order)?;
        self.store.mark_order_inactive(&txn, &order.id)?;
        txn.commit().map_err(StoreError::from)?;

        tracing::info!(order_id = %order.id, actor = actor_id, reason, "Order cancelled");
        self.notifier
            .publish(
                &order,
                OrderEventType::OrderCancelled,
                format!("Order cancelled: {reason}"),
                Some(actor_id),
            )
            .await;
        Ok(())
    }

    // ========== Queries ==========

    pub fn get_order(&self, order_id: &str) -> WorkflowResult<Order> {
        self.store
            .get_order(order_id)?
            .ok_or_else(|| WorkflowError::NotFound(format!("order {order_id}")))
    }

    /// Customer order history, newest first.
    pub fn orders_for_customer(&self, customer_id: &str) -> WorkflowResult<Vec<Order>> {
        Ok(self.store.find_by_customer(customer_id)?)
    }

    /// Everything the kitchen display cares about.
    pub fn kitchen_orders(&self) -> WorkflowResult<Vec<Order>> {
        Ok(self.store.find_by_status(&[
            OrderStatus::Pending,
            OrderStatus::Confirmed,
            OrderStatus::Preparing,
            OrderStatus::Ready,
        ])?)
    }

    /// Orders a staff member of the given role could claim right now.
    pub fn claimable_orders(&self, role: ClaimRole) -> WorkflowResult<Vec<Order>> {
        let statuses: &[OrderStatus] = match role {
            ClaimRole::Chef => &[OrderStatus::Pending, OrderStatus::Confirmed],
            ClaimRole::Waiter => &[OrderStatus::Ready],
        };
        let mut orders = self.store.find_by_status(statuses)?;
        orders.retain(|o| o.active_claimant(role).is_none());
        Ok(orders)
    }

    /// Orders assigned to a staff member (active or past claims).
    pub fn orders_for_staff(&self, staff_id: &str) -> WorkflowResult<Vec<Order>> {
        Ok(self.store.find_by_assignee(staff_id)?)
    }

    // ========== Internal ==========

    fn load(&self, txn: &redb::WriteTransaction, order_id: &str) -> WorkflowResult<Order> {
        self.store
            .get_order_txn(txn, order_id)?
            .ok_or_else(|| WorkflowError::NotFound(format!("order {order_id}")))
    }
}

fn deny(order_id: &str, denied: Denied) -> WorkflowError {
    match denied {
        Denied::Terminal(status) => WorkflowError::TerminalState {
            order_id: order_id.to_string(),
            status,
        },
        Denied::NotPermitted { .. } => WorkflowError::Validation(denied.to_string()),
    }
}
