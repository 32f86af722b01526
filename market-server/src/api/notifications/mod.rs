//! Notification API Module
//!
//! Read-only feed over the outbox; dispatch is the worker's business.

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/notifications", routes())
}

fn routes() -> Router<ServerState> {
    Router::new().route("/", get(handler::list))
}
