//! Notification fan-out
//!
//! On every committed order mutation the workflow publishes one event to a
//! set of audiences: the owning customer's private channel, the general
//! staff broadcast, a status-specific role channel, and the table channel
//! when the order has one. Each audience send is independent and
//! fire-and-forget; a failed delivery is logged and never rolls back or
//! blocks anything.

mod transport;

pub use transport::{MemoryTransport, Transport, TransportError};

use std::sync::Arc;

use shared::order::{Order, OrderEvent, OrderEventType, OrderStatus};

/// Notification audience
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Topic {
    /// Owning customer's private channel
    Customer(String),
    /// General staff/admin broadcast
    Staff,
    /// Kitchen display channel
    Kitchen,
    /// Front-of-house (waiter) channel
    FrontOfHouse,
    /// Table-scoped channel
    Table(String),
}

impl Topic {
    /// Channel name on the transport.
    pub fn channel(&self) -> String {
        match self {
            Topic::Customer(id) => format!("customer/{id}"),
            Topic::Staff => "staff/orders".to_string(),
            Topic::Kitchen => "kitchen/orders".to_string(),
            Topic::FrontOfHouse => "front-of-house/orders".to_string(),
            Topic::Table(id) => format!("table/{id}"),
        }
    }
}

/// Resolve the audiences for an order update.
///
/// The role channel follows the order's current stage: kitchen while the
/// order is being confirmed/prepared, front-of-house once it is ready to
/// serve. A cancellation concerns both.
pub fn audiences(order: &Order) -> Vec<Topic> {
    let mut topics = vec![Topic::Customer(order.customer_id.clone()), Topic::Staff];

    match order.status {
        OrderStatus::Pending | OrderStatus::Confirmed | OrderStatus::Preparing => {
            topics.push(Topic::Kitchen);
        }
        OrderStatus::Ready | OrderStatus::Served | OrderStatus::Completed => {
            topics.push(Topic::FrontOfHouse);
        }
        OrderStatus::Cancelled => {
            topics.push(Topic::Kitchen);
            topics.push(Topic::FrontOfHouse);
        }
    }

    if let Some(table_id) = &order.table_id {
        topics.push(Topic::Table(table_id.clone()));
    }
    topics
}

/// Fan-out publisher
#[derive(Clone)]
pub struct Notifier {
    transport: Arc<dyn Transport>,
}

impl Notifier {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Publish one update to every audience of the order.
    ///
    /// Never returns an error; delivery problems are the transport's
    /// concern and only get logged here.
    pub async fn publish(
        &self,
        order: &Order,
        event_type: OrderEventType,
        message: impl Into<String>,
        actor_id: Option<&str>,
    ) {
        let event = OrderEvent::new(order, event_type, message, actor_id);
        for topic in audiences(order) {
            let channel = topic.channel();
            if let Err(e) = self.transport.deliver(&channel, &event).await {
                tracing::warn!(channel = %channel, error = %e, "Notification delivery skipped");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::order::{OrderItem, PaymentStatus};
    use shared::util::now_millis;

    fn test_order(table_id: Option<&str>, status: OrderStatus) -> Order {
        let items = vec![OrderItem {
            menu_item_id: "item-1".to_string(),
            name: "Espresso".to_string(),
            quantity: 1,
            unit_price: "2.50".parse().unwrap(),
            modifiers: vec![],
            note: None,
        }];
        let mut order = Order::new(
            "ORD-NOTIFY01".to_string(),
            "alice".to_string(),
            table_id.map(str::to_string),
            items,
            "CARD".to_string(),
            now_millis(),
        );
        order.status = status;
        order
    }

    #[test]
    fn pending_order_goes_to_customer_staff_kitchen_and_table() {
        let order = test_order(Some("T1"), OrderStatus::Pending);
        let topics = audiences(&order);
        assert_eq!(
            topics,
            vec![
                Topic::Customer("alice".to_string()),
                Topic::Staff,
                Topic::Kitchen,
                Topic::Table("T1".to_string()),
            ]
        );
    }

    #[test]
    fn ready_order_targets_front_of_house() {
        let order = test_order(None, OrderStatus::Ready);
        let topics = audiences(&order);
        assert!(topics.contains(&Topic::FrontOfHouse));
        assert!(!topics.contains(&Topic::Kitchen));
        assert!(!topics.iter().any(|t| matches!(t, Topic::Table(_))));
    }

    #[test]
    fn cancelled_order_reaches_both_role_channels() {
        let order = test_order(Some("T2"), OrderStatus::Cancelled);
        let topics = audiences(&order);
        assert!(topics.contains(&Topic::Kitchen));
        assert!(topics.contains(&Topic::FrontOfHouse));
    }

    #[tokio::test]
    async fn publish_delivers_to_subscribed_channels() {
        let transport = Arc::new(MemoryTransport::new());
        let mut customer_rx = transport.subscribe("customer/alice");
        let mut kitchen_rx = transport.subscribe("kitchen/orders");

        let notifier = Notifier::new(transport);
        let order = test_order(None, OrderStatus::Pending);
        notifier
            .publish(&order, OrderEventType::OrderCreated, "New order created", None)
            .await;

        let event = customer_rx.try_recv().unwrap();
        assert_eq!(event.order_id, "ORD-NOTIFY01");
        assert_eq!(event.event_type, OrderEventType::OrderCreated);
        assert_eq!(event.payment_status, PaymentStatus::Pending);
        assert!(kitchen_rx.try_recv().is_ok());
    }

    #[tokio::test]
    async fn publish_survives_channels_without_subscribers() {
        let notifier = Notifier::new(Arc::new(MemoryTransport::new()));
        let order = test_order(Some("T3"), OrderStatus::Pending);
        // No subscribers anywhere; must not panic or error
        notifier
            .publish(&order, OrderEventType::OrderCreated, "New order created", None)
            .await;
    }
}
