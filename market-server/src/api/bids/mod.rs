//! Bid API Module
//!
//! Token-gated bid placement and listings.

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/bids", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::place))
        .route("/mine", get(handler::list_mine))
        .route("/project/{project_id}", get(handler::list_by_project))
}
