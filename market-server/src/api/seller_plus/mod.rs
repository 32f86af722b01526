//! Seller Plus API Module
//!
//! Flat-rate subscription purchase and the service listings it features.

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/seller-plus", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/purchase", post(handler::purchase))
        .route("/status", get(handler::status))
        .route("/services", get(handler::list_services).post(handler::create_service))
}
