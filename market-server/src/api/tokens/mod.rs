//! Token API Module
//!
//! Balance, plans, and idempotent purchases.

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/tokens", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/balance", get(handler::balance))
        .route("/plans", get(handler::plans))
        .route("/purchase", post(handler::purchase))
        .route("/purchases", get(handler::purchases))
}
