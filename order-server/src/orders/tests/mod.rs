//! Workflow test harness and shared helpers

mod test_claims;

use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;

use shared::order::{LineItemInput, Order};

use crate::notify::{MemoryTransport, Notifier};
use crate::orders::{CreateOrder, OrderStore, OrderWorkflow};
use crate::services::{
    CartError, CartService, InMemoryCatalog, MenuItemInfo, ModifierInfo, NoopCart,
};

pub(crate) fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

pub(crate) struct TestHarness {
    pub workflow: Arc<OrderWorkflow>,
    pub transport: Arc<MemoryTransport>,
}

/// Cart collaborator that always fails, for best-effort tests.
pub(crate) struct FailingCart;

#[async_trait]
impl CartService for FailingCart {
    async fn clear_cart(&self, _customer_id: &str, _table_id: Option<&str>) -> Result<(), CartError> {
        Err(CartError::Request("cart service unreachable".to_string()))
    }
}

pub(crate) fn harness() -> TestHarness {
    harness_with_cart(Arc::new(NoopCart))
}

pub(crate) fn harness_with_cart(cart: Arc<dyn CartService>) -> TestHarness {
    let store = OrderStore::open_in_memory().unwrap();

    let catalog = Arc::new(InMemoryCatalog::new());
    catalog.insert(MenuItemInfo {
        id: "espresso".to_string(),
        name: "Espresso".to_string(),
        price: dec("2.50"),
        available: true,
        modifiers: vec![ModifierInfo {
            id: "oat-milk".to_string(),
            name: "Oat milk".to_string(),
            price_adjustment: dec("0.50"),
        }],
    });
    catalog.insert(MenuItemInfo {
        id: "tostada".to_string(),
        name: "Tostada".to_string(),
        price: dec("4.50"),
        available: true,
        modifiers: vec![],
    });
    catalog.insert(MenuItemInfo {
        id: "day-old-croissant".to_string(),
        name: "Croissant".to_string(),
        price: dec("1.80"),
        available: false,
        modifiers: vec![],
    });

    let transport = Arc::new(MemoryTransport::new());
    let notifier = Notifier::new(transport.clone());
    let workflow = Arc::new(OrderWorkflow::new(store, catalog, cart, notifier));

    TestHarness {
        workflow,
        transport,
    }
}

pub(crate) fn line(menu_item_id: &str, quantity: i32) -> LineItemInput {
    LineItemInput {
        menu_item_id: menu_item_id.to_string(),
        quantity,
        modifier_ids: vec![],
        note: None,
    }
}

/// Standard order: 3 × espresso @ 2.50 + 1 × tostada @ 4.50 = 12.00
pub(crate) async fn place_order(h: &TestHarness) -> Order {
    h.workflow
        .create_order(CreateOrder {
            customer_id: "alice".to_string(),
            table_id: Some("T1".to_string()),
            items: vec![line("espresso", 3), line("tostada", 1)],
            payment_method: "CARD".to_string(),
        })
        .await
        .unwrap()
}
