//! redb-based order store
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `orders` | `order_id` | JSON `Order` | Order records |
//! | `active_orders` | `order_id` | `()` | Non-terminal order index |
//!
//! # Atomicity
//!
//! All mutations go through a write transaction: the workflow re-reads the
//! order inside the transaction, checks its preconditions against that
//! fresh read, and commits the mutation. redb serializes write
//! transactions, so a racing mutation observes the winner's committed
//! state - this is the compare-and-set primitive the claim manager relies
//! on. Never mutate an order through separate read and write steps.

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition, WriteTransaction};
use shared::order::{Order, OrderStatus};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Table for order records: key = order_id, value = JSON-serialized Order
const ORDERS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("orders");

/// Table for tracking non-terminal orders: key = order_id, value = empty
const ACTIVE_ORDERS_TABLE: TableDefinition<&str, ()> = TableDefinition::new("active_orders");

/// Storage errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Order store backed by redb
#[derive(Clone)]
pub struct OrderStore {
    db: Arc<Database>,
}

impl OrderStore {
    /// Open or create the database at the given path.
    ///
    /// Commits are durable as soon as `commit()` returns; the database file
    /// stays consistent across power loss (copy-on-write with atomic
    /// pointer swap).
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Open an in-memory database (for testing)
    #[cfg(test)]
    pub fn open_in_memory() -> StoreResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> StoreResult<Self> {
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(ORDERS_TABLE)?;
            let _ = write_txn.open_table(ACTIVE_ORDERS_TABLE)?;
        }
        write_txn.commit()?;
        Ok(Self { db: Arc::new(db) })
    }

    /// Begin a write transaction
    pub fn begin_write(&self) -> StoreResult<WriteTransaction> {
        Ok(self.db.begin_write()?)
    }

    // ========== Write Operations (within transaction) ==========

    /// Store an order (insert or overwrite)
    pub fn store_order(&self, txn: &WriteTransaction, order: &Order) -> StoreResult<()> {
        let mut table = txn.open_table(ORDERS_TABLE)?;
        let value = serde_json::to_vec(order)?;
        table.insert(order.id.as_str(), value.as_slice())?;
        Ok(())
    }

    /// Get an order within a write transaction (fresh read for check-and-set)
    pub fn get_order_txn(&self, txn: &WriteTransaction, order_id: &str) -> StoreResult<Option<Order>> {
        let table = txn.open_table(ORDERS_TABLE)?;
        match table.get(order_id)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    /// Add an order to the active index
    pub fn mark_order_active(&self, txn: &WriteTransaction, order_id: &str) -> StoreResult<()> {
        let mut table = txn.open_table(ACTIVE_ORDERS_TABLE)?;
        table.insert(order_id, ())?;
        Ok(())
    }

    /// Remove an order from the active index (terminal status reached)
    pub fn mark_order_inactive(&self, txn: &WriteTransaction, order_id: &str) -> StoreResult<()> {
        let mut table = txn.open_table(ACTIVE_ORDERS_TABLE)?;
        table.remove(order_id)?;
        Ok(())
    }

    // ========== Read Operations ==========

    /// Get an order by ID
    pub fn get_order(&self, order_id: &str) -> StoreResult<Option<Order>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;
        match table.get(order_id)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    /// Get all non-terminal orders
    pub fn get_active_orders(&self) -> StoreResult<Vec<Order>> {
        let read_txn = self.db.begin_read()?;
        let active_table = read_txn.open_table(ACTIVE_ORDERS_TABLE)?;
        let orders_table = read_txn.open_table(ORDERS_TABLE)?;

        let mut orders = Vec::new();
        for result in active_table.iter()? {
            let (key, _value) = result?;
            if let Some(guard) = orders_table.get(key.value())? {
                orders.push(serde_json::from_slice(guard.value())?);
            }
        }
        orders.sort_by_key(|o: &Order| o.created_at);
        Ok(orders)
    }

    /// Get all orders for a customer, newest first
    pub fn find_by_customer(&self, customer_id: &str) -> StoreResult<Vec<Order>> {
        let mut orders = self.scan(|order| order.customer_id == customer_id)?;
        orders.sort_by_key(|o| std::cmp::Reverse(o.created_at));
        Ok(orders)
    }

    /// Get active orders whose status is in the given set
    pub fn find_by_status(&self, statuses: &[OrderStatus]) -> StoreResult<Vec<Order>> {
        let mut orders = self.get_active_orders()?;
        orders.retain(|o| statuses.contains(&o.status));
        Ok(orders)
    }

    /// Get all orders assigned to a staff member (either slot), newest first
    pub fn find_by_assignee(&self, staff_id: &str) -> StoreResult<Vec<Order>> {
        let mut orders = self.scan(|order| {
            order.assigned_chef.as_deref() == Some(staff_id)
                || order.assigned_waiter.as_deref() == Some(staff_id)
        })?;
        orders.sort_by_key(|o| std::cmp::Reverse(o.created_at));
        Ok(orders)
    }

    /// Full scan with a filter. Order volume per store is bounded by the
    /// archive job upstream, so a scan is acceptable here.
    fn scan(&self, mut keep: impl FnMut(&Order) -> bool) -> StoreResult<Vec<Order>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;

        let mut orders = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            let order: Order = serde_json::from_slice(value.value())?;
            if keep(&order) {
                orders.push(order);
            }
        }
        Ok(orders)
    }
}
