//! Order API Module
//!
//! All mutations go through the workflow service; there is no direct store
//! access from handlers.

mod handler;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::core::ServerState;

/// Order router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        // Creation and queries
        .route("/", post(handler::create))
        .route("/kitchen", get(handler::kitchen_orders))
        .route("/claimable/{role}", get(handler::claimable))
        .route("/customer/{customer_id}", get(handler::list_for_customer))
        .route("/staff/{staff_id}", get(handler::list_for_staff))
        .route("/{id}", get(handler::get_by_id))
        // Status transitions
        .route("/{id}/status", patch(handler::change_status))
        .route("/{id}/cancel", post(handler::cancel))
        // Claim workflow
        .route("/{id}/claim", post(handler::claim))
        .route("/{id}/release", post(handler::release))
        .route("/{id}/ready", post(handler::mark_ready))
        .route("/{id}/complete", post(handler::complete_service))
        .route("/{id}/assign", post(handler::force_assign))
}
