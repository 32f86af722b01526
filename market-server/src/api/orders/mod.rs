//! Order API Module
//!
//! Lifecycle endpoints: creation (platform), delivery, acceptance, manual
//! transitions, payment link stub.

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/delivery", post(handler::submit_delivery))
        .route("/{id}/accept", post(handler::accept_delivery))
        .route("/{id}/transition", post(handler::transition))
        .route("/{id}/payment-link", get(handler::payment_link))
}
