//! Claim slot operations
//!
//! A claim is an exclusive, role-scoped, per-order lock granting a staff
//! actor the right to advance that order's workflow. The functions here are
//! pure mutations on a loaded order; the workflow applies them inside a
//! single store write transaction, which makes each check-and-set atomic
//! against racing requests (see `workflow`).

use shared::order::{ClaimRecord, ClaimRole, Order, OrderStatus};

use super::error::{WorkflowError, WorkflowResult};

/// States from which each slot may be claimed.
///
/// Chefs may pick up an order before or after payment confirmation; waiters
/// only once the kitchen marked it ready.
fn claimable_from(role: ClaimRole) -> &'static [OrderStatus] {
    match role {
        ClaimRole::Chef => &[OrderStatus::Pending, OrderStatus::Confirmed],
        ClaimRole::Waiter => &[OrderStatus::Ready],
    }
}

/// Status a successful claim advances the order to.
fn claimed_status(role: ClaimRole) -> OrderStatus {
    match role {
        ClaimRole::Chef => OrderStatus::Preparing,
        ClaimRole::Waiter => OrderStatus::Served,
    }
}

/// Status a pure release reverts the order to, so it re-enters the pool.
fn released_status(role: ClaimRole) -> OrderStatus {
    match role {
        ClaimRole::Chef => OrderStatus::Pending,
        ClaimRole::Waiter => OrderStatus::Ready,
    }
}

/// Status the order must hold before the claimant can finalize its stage.
fn finalizable_from(role: ClaimRole) -> OrderStatus {
    claimed_status(role)
}

/// Status the finalize step advances to.
fn finalized_status(role: ClaimRole) -> OrderStatus {
    match role {
        ClaimRole::Chef => OrderStatus::Ready,
        ClaimRole::Waiter => OrderStatus::Completed,
    }
}

/// Outcome of a claim attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// Slot taken, status advanced; persist the order.
    Claimed,
    /// Same actor already holds the slot; nothing to persist.
    AlreadyHeldByCaller,
}

/// Attempt to claim a slot for `actor_id`.
///
/// Succeeds if the slot is inactive and the order is in a claimable state,
/// or idempotently if the caller already holds it. A racing claimant that
/// committed first is reported as [`WorkflowError::AlreadyClaimed`] naming
/// the holder.
pub fn try_claim(
    order: &mut Order,
    role: ClaimRole,
    actor_id: &str,
    now: i64,
) -> WorkflowResult<ClaimOutcome> {
    if order.is_terminal() {
        return Err(WorkflowError::TerminalState {
            order_id: order.id.clone(),
            status: order.status,
        });
    }

    if let Some(holder) = order.active_claimant(role) {
        if holder == actor_id {
            return Ok(ClaimOutcome::AlreadyHeldByCaller);
        }
        return Err(WorkflowError::AlreadyClaimed {
            order_id: order.id.clone(),
            holder: holder.to_string(),
        });
    }

    if !claimable_from(role).contains(&order.status) {
        return Err(WorkflowError::Validation(format!(
            "order {} is not claimable by a {} in status {}",
            order.id, role, order.status
        )));
    }

    order.set_claim(
        role,
        ClaimRecord {
            claimant_id: actor_id.to_string(),
            claimed_at: now,
            active: true,
        },
    );
    order.set_assigned(role, actor_id);
    order.record_status(
        claimed_status(role),
        actor_id,
        Some(format!("Claimed by {role}")),
        now,
    );
    Ok(ClaimOutcome::Claimed)
}

/// Release a slot without finalizing the stage.
///
/// Only the current holder or an admin may release. The slot goes inactive,
/// the assignment is retained for audit, and the status reverts to the
/// state the claim advanced from so other staff can pick the order up.
pub fn release_slot(
    order: &mut Order,
    role: ClaimRole,
    actor_id: &str,
    is_admin: bool,
    now: i64,
) -> WorkflowResult<()> {
    if order.is_terminal() {
        return Err(WorkflowError::TerminalState {
            order_id: order.id.clone(),
            status: order.status,
        });
    }

    let holder = order.active_claimant(role).ok_or_else(|| {
        WorkflowError::Validation(format!(
            "order {} has no active {} claim to release",
            order.id, role
        ))
    })?;
    if !is_admin && holder != actor_id {
        return Err(WorkflowError::Validation(format!(
            "only the current {role} or an admin may release this claim"
        )));
    }

    order.release_claim(role);
    if order.status == claimed_status(role) {
        order.record_status(
            released_status(role),
            actor_id,
            Some(format!("{role} claim released")),
            now,
        );
    } else {
        order.touch(now);
    }
    Ok(())
}

/// Finalize the claimant's stage: advance status and release the slot in
/// one step (chef: mark ready; waiter: complete service).
pub fn finalize_stage(
    order: &mut Order,
    role: ClaimRole,
    actor_id: &str,
    now: i64,
) -> WorkflowResult<()> {
    if order.is_terminal() {
        return Err(WorkflowError::TerminalState {
            order_id: order.id.clone(),
            status: order.status,
        });
    }

    match order.active_claimant(role) {
        Some(holder) if holder == actor_id => {}
        Some(_) | None => {
            return Err(WorkflowError::Validation(format!(
                "only the {role} holding order {} may finalize it",
                order.id
            )));
        }
    }

    let expected = finalizable_from(role);
    if order.status != expected {
        return Err(WorkflowError::Validation(format!(
            "order {} must be in status {} to finalize, found {}",
            order.id, expected, order.status
        )));
    }

    order.release_claim(role);
    order.record_status(finalized_status(role), actor_id, None, now);
    Ok(())
}

/// Admin force-claim: take the slot for `staff_id` regardless of an
/// existing active claim. Used for staff unavailability; callers log it
/// distinctly from a normal claim.
pub fn force_claim(
    order: &mut Order,
    role: ClaimRole,
    staff_id: &str,
    admin_id: &str,
    now: i64,
) -> WorkflowResult<()> {
    if order.is_terminal() {
        return Err(WorkflowError::TerminalState {
            order_id: order.id.clone(),
            status: order.status,
        });
    }

    order.set_claim(
        role,
        ClaimRecord {
            claimant_id: staff_id.to_string(),
            claimed_at: now,
            active: true,
        },
    );
    order.set_assigned(role, staff_id);

    // Advance the workflow only when the order was still in the pool; a
    // reassignment mid-stage keeps the current status.
    let status = if claimable_from(role).contains(&order.status) {
        claimed_status(role)
    } else {
        order.status
    };
    order.record_status(
        status,
        admin_id,
        Some(format!("Force-assigned to {role} {staff_id}")),
        now,
    );
    Ok(())
}
