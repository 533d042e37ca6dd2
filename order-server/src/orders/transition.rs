//! Status transition validation
//!
//! A declarative role → permitted-target-status table, consulted once per
//! request. Unlisted combinations are denied; the terminal rule applies to
//! every role, admins included.

use shared::order::{ActorRole, OrderStatus};

/// Outcome of a permitted transition request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Apply the requested status.
    Apply,
    /// `current == requested`: succeed without mutating (retry support).
    Noop,
}

/// Denial with enough structure for the workflow to pick the right error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Denied {
    /// Current status is terminal; nothing may transition out of it.
    Terminal(OrderStatus),
    /// The role/current/target combination is not in the table.
    NotPermitted {
        role: ActorRole,
        current: OrderStatus,
        requested: OrderStatus,
    },
}

impl std::fmt::Display for Denied {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Denied::Terminal(status) => write!(f, "order is in terminal status {status}"),
            Denied::NotPermitted {
                role,
                current,
                requested,
            } => write!(
                f,
                "{role:?} may not move an order from {current} to {requested}"
            ),
        }
    }
}

/// Target statuses a chef may request.
const CHEF_TARGETS: &[OrderStatus] = &[
    OrderStatus::Confirmed,
    OrderStatus::Preparing,
    OrderStatus::Ready,
];

/// Target statuses a waiter may request.
const WAITER_TARGETS: &[OrderStatus] = &[
    OrderStatus::Ready,
    OrderStatus::Served,
    OrderStatus::Completed,
];

/// Customers may only cancel, and only before the kitchen starts.
const CUSTOMER_CANCELLABLE_FROM: &[OrderStatus] = &[OrderStatus::Pending, OrderStatus::Confirmed];

/// Validate a transition request.
///
/// Admins may request any target, including reverse transitions, on
/// non-terminal orders. A request where `current == requested` is an
/// idempotent no-op success; see the workflow for the persistence side.
pub fn can_transition(
    current: OrderStatus,
    requested: OrderStatus,
    role: ActorRole,
) -> Result<Transition, Denied> {
    if current.is_terminal() {
        return Err(Denied::Terminal(current));
    }
    if current == requested {
        return Ok(Transition::Noop);
    }

    let permitted = match role {
        ActorRole::Admin => true,
        ActorRole::Chef => CHEF_TARGETS.contains(&requested),
        ActorRole::Waiter => WAITER_TARGETS.contains(&requested),
        ActorRole::Customer => {
            requested == OrderStatus::Cancelled && CUSTOMER_CANCELLABLE_FROM.contains(&current)
        }
    };

    if permitted {
        Ok(Transition::Apply)
    } else {
        Err(Denied::NotPermitted {
            role,
            current,
            requested,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_STATUSES: &[OrderStatus] = &[
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Preparing,
        OrderStatus::Ready,
        OrderStatus::Served,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    const ALL_ROLES: &[ActorRole] = &[
        ActorRole::Admin,
        ActorRole::Chef,
        ActorRole::Waiter,
        ActorRole::Customer,
    ];

    #[test]
    fn terminal_states_deny_everything_for_every_role() {
        for &current in &[OrderStatus::Completed, OrderStatus::Cancelled] {
            for &requested in ALL_STATUSES {
                for &role in ALL_ROLES {
                    assert_eq!(
                        can_transition(current, requested, role),
                        Err(Denied::Terminal(current)),
                        "{role:?}: {current} -> {requested} should hit the terminal rule"
                    );
                }
            }
        }
    }

    #[test]
    fn same_status_request_is_noop() {
        for &status in ALL_STATUSES {
            if status.is_terminal() {
                continue;
            }
            for &role in ALL_ROLES {
                assert_eq!(can_transition(status, status, role), Ok(Transition::Noop));
            }
        }
    }

    #[test]
    fn admin_may_request_any_target_including_reverse() {
        assert_eq!(
            can_transition(OrderStatus::Ready, OrderStatus::Pending, ActorRole::Admin),
            Ok(Transition::Apply)
        );
        assert_eq!(
            can_transition(OrderStatus::Pending, OrderStatus::Completed, ActorRole::Admin),
            Ok(Transition::Apply)
        );
        assert_eq!(
            can_transition(OrderStatus::Served, OrderStatus::Cancelled, ActorRole::Admin),
            Ok(Transition::Apply)
        );
    }

    #[test]
    fn chef_targets_are_exactly_confirmed_preparing_ready() {
        for &requested in ALL_STATUSES {
            let result = can_transition(OrderStatus::Pending, requested, ActorRole::Chef);
            let in_table = matches!(
                requested,
                OrderStatus::Confirmed | OrderStatus::Preparing | OrderStatus::Ready
            );
            if requested == OrderStatus::Pending {
                assert_eq!(result, Ok(Transition::Noop));
            } else if in_table {
                assert_eq!(result, Ok(Transition::Apply), "chef -> {requested}");
            } else {
                assert!(result.is_err(), "chef -> {requested} must be denied");
            }
        }
    }

    #[test]
    fn waiter_targets_are_exactly_ready_served_completed() {
        for &requested in ALL_STATUSES {
            let result = can_transition(OrderStatus::Preparing, requested, ActorRole::Waiter);
            let in_table = matches!(
                requested,
                OrderStatus::Ready | OrderStatus::Served | OrderStatus::Completed
            );
            if requested == OrderStatus::Preparing {
                assert_eq!(result, Ok(Transition::Noop));
            } else if in_table {
                assert_eq!(result, Ok(Transition::Apply), "waiter -> {requested}");
            } else {
                assert!(result.is_err(), "waiter -> {requested} must be denied");
            }
        }
    }

    #[test]
    fn customer_may_only_cancel_before_preparation() {
        assert_eq!(
            can_transition(OrderStatus::Pending, OrderStatus::Cancelled, ActorRole::Customer),
            Ok(Transition::Apply)
        );
        assert_eq!(
            can_transition(OrderStatus::Confirmed, OrderStatus::Cancelled, ActorRole::Customer),
            Ok(Transition::Apply)
        );
        // Too late once the kitchen has the order
        for &current in &[OrderStatus::Preparing, OrderStatus::Ready, OrderStatus::Served] {
            assert!(
                can_transition(current, OrderStatus::Cancelled, ActorRole::Customer).is_err(),
                "customer cancel from {current} must be denied"
            );
        }
        // Customers never move an order forward
        for &requested in ALL_STATUSES {
            if requested == OrderStatus::Cancelled || requested == OrderStatus::Pending {
                continue;
            }
            assert!(
                can_transition(OrderStatus::Pending, requested, ActorRole::Customer).is_err(),
                "customer -> {requested} must be denied"
            );
        }
    }

    #[test]
    fn deny_by_default_for_unlisted_combinations() {
        // A sample of combinations that appear in no role table
        let denied = [
            (OrderStatus::Ready, OrderStatus::Pending, ActorRole::Chef),
            (OrderStatus::Pending, OrderStatus::Cancelled, ActorRole::Chef),
            (OrderStatus::Ready, OrderStatus::Confirmed, ActorRole::Waiter),
            (OrderStatus::Served, OrderStatus::Cancelled, ActorRole::Waiter),
            (OrderStatus::Confirmed, OrderStatus::Served, ActorRole::Customer),
        ];
        for (current, requested, role) in denied {
            assert!(
                matches!(
                    can_transition(current, requested, role),
                    Err(Denied::NotPermitted { .. })
                ),
                "{role:?}: {current} -> {requested} must be denied"
            );
        }
    }
}
