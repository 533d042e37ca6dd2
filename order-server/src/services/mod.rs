//! External collaborator seams
//!
//! The workflow consumes the menu catalog and cart services through traits
//! injected at construction time; deployments wire the HTTP clients, tests
//! wire the in-memory implementations.

pub mod cart;
pub mod catalog;

pub use cart::{CartError, CartService, HttpCart, NoopCart};
pub use catalog::{CatalogError, HttpCatalog, InMemoryCatalog, MenuCatalog, MenuItemInfo, ModifierInfo};
