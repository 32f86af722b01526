//! Milestone API Module
//!
//! Batch upsert and listing of milestones under an engagement.

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/engagements", routes())
}

fn routes() -> Router<ServerState> {
    Router::new().route(
        "/{id}/milestones",
        get(handler::list).put(handler::upsert_batch),
    )
}
