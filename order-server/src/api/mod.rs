//! HTTP API surface
//!
//! Thin translation layer: handlers parse and validate requests, call the
//! workflow service, and map domain errors to HTTP responses.

pub mod orders;
pub mod payments;

use axum::Router;

use crate::core::ServerState;

/// Assemble all API routers.
pub fn router() -> Router<ServerState> {
    Router::new()
        .merge(orders::router())
        .merge(payments::router())
}
