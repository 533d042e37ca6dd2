//! Claim slot tests: mutual exclusion, idempotency, release and override

use shared::order::{ActorRole, ClaimRole, OrderStatus};

use super::{harness, place_order};
use crate::orders::WorkflowError;

// ========================================================================
// Claim
// ========================================================================

#[tokio::test]
async fn chef_claim_advances_to_preparing() {
    let h = harness();
    let order = place_order(&h).await;

    let claimed = h
        .workflow
        .claim(&order.id, ClaimRole::Chef, "chef-a")
        .await
        .unwrap();

    assert_eq!(claimed.status, OrderStatus::Preparing);
    assert_eq!(claimed.assigned_chef.as_deref(), Some("chef-a"));
    assert_eq!(claimed.active_claimant(ClaimRole::Chef), Some("chef-a"));
    assert_eq!(
        claimed.status_history.last().unwrap().status,
        OrderStatus::Preparing
    );
}

#[tokio::test]
async fn second_chef_claim_denied_naming_holder() {
    let h = harness();
    let order = place_order(&h).await;
    h.workflow
        .claim(&order.id, ClaimRole::Chef, "chef-a")
        .await
        .unwrap();

    let result = h.workflow.claim(&order.id, ClaimRole::Chef, "chef-b").await;
    match result {
        Err(WorkflowError::AlreadyClaimed { holder, .. }) => assert_eq!(holder, "chef-a"),
        other => panic!("expected AlreadyClaimed, got {other:?}"),
    }
}

#[tokio::test]
async fn reclaim_by_holder_is_idempotent() {
    let h = harness();
    let order = place_order(&h).await;

    let first = h
        .workflow
        .claim(&order.id, ClaimRole::Chef, "chef-a")
        .await
        .unwrap();
    let second = h
        .workflow
        .claim(&order.id, ClaimRole::Chef, "chef-a")
        .await
        .unwrap();

    assert_eq!(second.status, OrderStatus::Preparing);
    // No duplicate history entries beyond the initial transition
    assert_eq!(first.status_history.len(), second.status_history.len());
}

#[tokio::test]
async fn waiter_claim_requires_ready_status() {
    let h = harness();
    let order = place_order(&h).await;

    let result = h
        .workflow
        .claim(&order.id, ClaimRole::Waiter, "waiter-a")
        .await;
    assert!(matches!(result, Err(WorkflowError::Validation(_))));
}

#[tokio::test]
async fn chef_claim_works_after_payment_confirmation() {
    let h = harness();
    let order = place_order(&h).await;
    h.workflow
        .update_payment_status(&order.id, shared::order::PaymentStatus::Paid, None)
        .await
        .unwrap();

    let claimed = h
        .workflow
        .claim(&order.id, ClaimRole::Chef, "chef-a")
        .await
        .unwrap();
    assert_eq!(claimed.status, OrderStatus::Preparing);
}

#[tokio::test]
async fn claim_on_terminal_order_denied() {
    let h = harness();
    let order = place_order(&h).await;
    h.workflow
        .cancel_order(&order.id, "alice", ActorRole::Customer, "test")
        .await
        .unwrap();

    let result = h.workflow.claim(&order.id, ClaimRole::Chef, "chef-a").await;
    assert!(matches!(result, Err(WorkflowError::TerminalState { .. })));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_chef_claims_have_exactly_one_winner() {
    let h = harness();
    let order = place_order(&h).await;

    let (w1, id1) = (h.workflow.clone(), order.id.clone());
    let (w2, id2) = (h.workflow.clone(), order.id.clone());
    let a = tokio::spawn(async move { w1.claim(&id1, ClaimRole::Chef, "chef-a").await });
    let b = tokio::spawn(async move { w2.claim(&id2, ClaimRole::Chef, "chef-b").await });

    let result_a = a.await.unwrap();
    let result_b = b.await.unwrap();
    assert_ne!(
        result_a.is_ok(),
        result_b.is_ok(),
        "exactly one claim must win"
    );

    let winner = if result_a.is_ok() { "chef-a" } else { "chef-b" };
    let loser_error = if result_a.is_ok() { result_b } else { result_a };
    match loser_error {
        Err(WorkflowError::AlreadyClaimed { holder, .. }) => assert_eq!(holder, winner),
        other => panic!("loser must get AlreadyClaimed naming the winner, got {other:?}"),
    }

    let persisted = h.workflow.get_order(&order.id).unwrap();
    assert_eq!(persisted.status, OrderStatus::Preparing);
    assert_eq!(persisted.assigned_chef.as_deref(), Some(winner));
    // History reflects only the winning transition
    assert_eq!(persisted.status_history.len(), 2);
}

// ========================================================================
// Finalize (mark ready / complete service)
// ========================================================================

#[tokio::test]
async fn mark_ready_releases_slot_and_keeps_assignment() {
    let h = harness();
    let order = place_order(&h).await;
    h.workflow
        .claim(&order.id, ClaimRole::Chef, "chef-a")
        .await
        .unwrap();

    let ready = h.workflow.mark_ready(&order.id, "chef-a").await.unwrap();

    assert_eq!(ready.status, OrderStatus::Ready);
    assert_eq!(ready.active_claimant(ClaimRole::Chef), None);
    assert_eq!(ready.assigned_chef.as_deref(), Some("chef-a"));
    assert!(!ready.claim(ClaimRole::Chef).unwrap().active);
}

#[tokio::test]
async fn mark_ready_requires_the_holder() {
    let h = harness();
    let order = place_order(&h).await;
    h.workflow
        .claim(&order.id, ClaimRole::Chef, "chef-a")
        .await
        .unwrap();

    let result = h.workflow.mark_ready(&order.id, "chef-b").await;
    assert!(matches!(result, Err(WorkflowError::Validation(_))));
}

#[tokio::test]
async fn full_claim_flow_reaches_completed() {
    let h = harness();
    let order = place_order(&h).await;

    h.workflow
        .claim(&order.id, ClaimRole::Chef, "chef-a")
        .await
        .unwrap();
    h.workflow.mark_ready(&order.id, "chef-a").await.unwrap();

    let served = h
        .workflow
        .claim(&order.id, ClaimRole::Waiter, "waiter-a")
        .await
        .unwrap();
    assert_eq!(served.status, OrderStatus::Served);
    assert_eq!(served.assigned_waiter.as_deref(), Some("waiter-a"));

    let completed = h
        .workflow
        .complete_service(&order.id, "waiter-a")
        .await
        .unwrap();
    assert_eq!(completed.status, OrderStatus::Completed);
    assert_eq!(completed.active_claimant(ClaimRole::Waiter), None);
    assert_eq!(completed.assigned_waiter.as_deref(), Some("waiter-a"));

    // Terminal order left the kitchen pool
    assert!(h.workflow.kitchen_orders().unwrap().is_empty());
}

// ========================================================================
// Release
// ========================================================================

#[tokio::test]
async fn release_reverts_status_and_reopens_the_pool() {
    let h = harness();
    let order = place_order(&h).await;
    h.workflow
        .claim(&order.id, ClaimRole::Chef, "chef-a")
        .await
        .unwrap();

    let released = h
        .workflow
        .release(&order.id, ClaimRole::Chef, "chef-a", ActorRole::Chef)
        .await
        .unwrap();

    assert_eq!(released.status, OrderStatus::Pending);
    assert_eq!(released.active_claimant(ClaimRole::Chef), None);
    // Assignment retained for audit
    assert_eq!(released.assigned_chef.as_deref(), Some("chef-a"));

    let claimable = h.workflow.claimable_orders(ClaimRole::Chef).unwrap();
    assert!(claimable.iter().any(|o| o.id == order.id));

    // Another chef can now take it
    let reclaimed = h
        .workflow
        .claim(&order.id, ClaimRole::Chef, "chef-b")
        .await
        .unwrap();
    assert_eq!(reclaimed.active_claimant(ClaimRole::Chef), Some("chef-b"));
}

#[tokio::test]
async fn release_by_non_holder_denied_but_admin_allowed() {
    let h = harness();
    let order = place_order(&h).await;
    h.workflow
        .claim(&order.id, ClaimRole::Chef, "chef-a")
        .await
        .unwrap();

    let denied = h
        .workflow
        .release(&order.id, ClaimRole::Chef, "chef-b", ActorRole::Chef)
        .await;
    assert!(matches!(denied, Err(WorkflowError::Validation(_))));

    let released = h
        .workflow
        .release(&order.id, ClaimRole::Chef, "admin-1", ActorRole::Admin)
        .await
        .unwrap();
    assert_eq!(released.active_claimant(ClaimRole::Chef), None);
}

#[tokio::test]
async fn release_without_active_claim_denied() {
    let h = harness();
    let order = place_order(&h).await;

    let result = h
        .workflow
        .release(&order.id, ClaimRole::Chef, "chef-a", ActorRole::Chef)
        .await;
    assert!(matches!(result, Err(WorkflowError::Validation(_))));
}

// ========================================================================
// Admin force-assign
// ========================================================================

#[tokio::test]
async fn force_assign_overrides_an_active_claim() {
    let h = harness();
    let order = place_order(&h).await;
    h.workflow
        .claim(&order.id, ClaimRole::Chef, "chef-a")
        .await
        .unwrap();

    let reassigned = h
        .workflow
        .force_assign(&order.id, ClaimRole::Chef, "chef-b", "admin-1")
        .await
        .unwrap();

    assert_eq!(reassigned.active_claimant(ClaimRole::Chef), Some("chef-b"));
    assert_eq!(reassigned.assigned_chef.as_deref(), Some("chef-b"));
    // Mid-stage reassignment keeps the workflow where it was
    assert_eq!(reassigned.status, OrderStatus::Preparing);
    let last = reassigned.status_history.last().unwrap();
    assert_eq!(last.actor_id, "admin-1");
    assert!(last.note.as_deref().unwrap().contains("Force-assigned"));
}

#[tokio::test]
async fn force_assign_from_the_pool_advances_status() {
    let h = harness();
    let order = place_order(&h).await;

    let assigned = h
        .workflow
        .force_assign(&order.id, ClaimRole::Chef, "chef-b", "admin-1")
        .await
        .unwrap();

    assert_eq!(assigned.status, OrderStatus::Preparing);
    assert_eq!(assigned.active_claimant(ClaimRole::Chef), Some("chef-b"));
}

// ========================================================================
// Pool queries
// ========================================================================

#[tokio::test]
async fn claimable_orders_exclude_claimed_ones() {
    let h = harness();
    let first = place_order(&h).await;
    let second = place_order(&h).await;

    h.workflow
        .claim(&first.id, ClaimRole::Chef, "chef-a")
        .await
        .unwrap();

    let claimable = h.workflow.claimable_orders(ClaimRole::Chef).unwrap();
    assert_eq!(claimable.len(), 1);
    assert_eq!(claimable[0].id, second.id);

    // Nothing is ready yet, so the waiter pool is empty
    assert!(h.workflow.claimable_orders(ClaimRole::Waiter).unwrap().is_empty());
}

#[tokio::test]
async fn staff_query_returns_assigned_orders() {
    let h = harness();
    let order = place_order(&h).await;
    h.workflow
        .claim(&order.id, ClaimRole::Chef, "chef-a")
        .await
        .unwrap();
    h.workflow.mark_ready(&order.id, "chef-a").await.unwrap();

    // Past (released) assignments still show up
    let orders = h.workflow.orders_for_staff("chef-a").unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].id, order.id);
}
