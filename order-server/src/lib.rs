//! Order workflow server
//!
//! Backend for restaurant order fulfillment:
//!
//! - **orders**: the core - order store (redb), status transition
//!   validation, claim/lock management, and the workflow service that
//!   orchestrates them
//! - **notify**: notification fan-out to customer/staff/table audiences
//! - **services**: external collaborator seams (menu catalog, cart)
//! - **api**: REST surface over the workflow service
//! - **core**: configuration, server state wiring, HTTP server
//!
//! # Request Flow
//!
//! ```text
//! HTTP request → api handler → OrderWorkflow
//!                                  ├─ transition::can_transition / claims::*
//!                                  ├─ OrderStore write transaction (atomic)
//!                                  └─ Notifier fan-out (post-commit, fire-and-forget)
//! ```

pub mod api;
pub mod core;
pub mod notify;
pub mod orders;
pub mod services;
pub mod utils;

// Re-exports
pub use crate::core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};
