//! Payment API Module
//!
//! Webhook endpoint for the payment provider's asynchronous status
//! callbacks. The server never calls the provider itself.

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

/// Payment router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/payments", routes())
}

fn routes() -> Router<ServerState> {
    Router::new().route("/webhook", post(handler::webhook))
}
