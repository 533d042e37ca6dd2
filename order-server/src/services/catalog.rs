//! Menu catalog collaborator
//!
//! Order creation resolves every line item here: price, availability and
//! the modifiers that may be attached. An unavailable item aborts creation.

use async_trait::async_trait;
use dashmap::DashMap;
use rust_decimal::Decimal;
use serde::Deserialize;

/// Modifier offered by a menu item
#[derive(Debug, Clone, Deserialize)]
pub struct ModifierInfo {
    pub id: String,
    pub name: String,
    pub price_adjustment: Decimal,
}

/// Menu item data needed for order creation
#[derive(Debug, Clone, Deserialize)]
pub struct MenuItemInfo {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    pub available: bool,
    #[serde(default)]
    pub modifiers: Vec<ModifierInfo>,
}

/// Catalog lookup errors
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog request failed: {0}")]
    Request(String),
}

/// Menu catalog lookup
#[async_trait]
pub trait MenuCatalog: Send + Sync {
    /// Look up a menu item; `None` when the catalog does not know the ID.
    async fn get_item(&self, id: &str) -> Result<Option<MenuItemInfo>, CatalogError>;
}

/// HTTP client for a remote catalog service
pub struct HttpCatalog {
    base_url: String,
    client: reqwest::Client,
}

impl HttpCatalog {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl MenuCatalog for HttpCatalog {
    async fn get_item(&self, id: &str) -> Result<Option<MenuItemInfo>, CatalogError> {
        let url = format!("{}/api/menu/items/{}", self.base_url, id);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CatalogError::Request(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = response
            .error_for_status()
            .map_err(|e| CatalogError::Request(e.to_string()))?;
        let item = response
            .json::<MenuItemInfo>()
            .await
            .map_err(|e| CatalogError::Request(e.to_string()))?;
        Ok(Some(item))
    }
}

/// In-memory catalog for tests and local runs
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    items: DashMap<String, MenuItemInfo>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, item: MenuItemInfo) {
        self.items.insert(item.id.clone(), item);
    }
}

#[async_trait]
impl MenuCatalog for InMemoryCatalog {
    async fn get_item(&self, id: &str) -> Result<Option<MenuItemInfo>, CatalogError> {
        Ok(self.items.get(id).map(|entry| entry.value().clone()))
    }
}
