//! Server state wiring

use std::path::Path;
use std::sync::Arc;

use crate::core::Config;
use crate::notify::{MemoryTransport, Notifier};
use crate::orders::{OrderStore, OrderWorkflow};
use crate::services::{HttpCart, HttpCatalog};
use crate::utils::{AppError, AppResult};

/// Shared state injected into every handler
#[derive(Clone)]
pub struct ServerState {
    pub workflow: Arc<OrderWorkflow>,
    /// In-process notification transport; real-time gateways subscribe here
    pub transport: Arc<MemoryTransport>,
}

impl ServerState {
    /// Open storage and wire the workflow with its collaborators.
    pub fn initialize(config: &Config) -> AppResult<Self> {
        let db_path = Path::new(&config.work_dir).join("orders.redb");
        let store = OrderStore::open(&db_path).map_err(|e| AppError::Database(e.to_string()))?;
        tracing::info!(path = %db_path.display(), "Order store opened");

        let catalog = Arc::new(HttpCatalog::new(config.catalog_service_url.clone()));
        let cart = Arc::new(HttpCart::new(config.cart_service_url.clone()));
        let transport = Arc::new(MemoryTransport::new());
        let notifier = Notifier::new(transport.clone());

        let workflow = Arc::new(OrderWorkflow::new(store, catalog, cart, notifier));
        Ok(Self {
            workflow,
            transport,
        })
    }
}
