//! Cart collaborator
//!
//! Invoked after order creation to clear the customer's cart. Strictly
//! best-effort: the workflow logs a failure and keeps the created order.

use async_trait::async_trait;
use serde_json::json;

/// Cart service errors
#[derive(Debug, thiserror::Error)]
pub enum CartError {
    #[error("cart request failed: {0}")]
    Request(String),
}

/// Cart clearing collaborator
#[async_trait]
pub trait CartService: Send + Sync {
    async fn clear_cart(&self, customer_id: &str, table_id: Option<&str>) -> Result<(), CartError>;
}

/// HTTP client for a remote cart service
pub struct HttpCart {
    base_url: String,
    client: reqwest::Client,
}

impl HttpCart {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl CartService for HttpCart {
    async fn clear_cart(&self, customer_id: &str, table_id: Option<&str>) -> Result<(), CartError> {
        let url = format!("{}/api/carts/clear", self.base_url);
        self.client
            .post(&url)
            .json(&json!({
                "customer_id": customer_id,
                "table_id": table_id,
            }))
            .send()
            .await
            .map_err(|e| CartError::Request(e.to_string()))?
            .error_for_status()
            .map_err(|e| CartError::Request(e.to_string()))?;
        Ok(())
    }
}

/// No-op cart for tests and deployments without a cart service
#[derive(Debug, Default)]
pub struct NoopCart;

#[async_trait]
impl CartService for NoopCart {
    async fn clear_cart(&self, _customer_id: &str, _table_id: Option<&str>) -> Result<(), CartError> {
        Ok(())
    }
}
