//! Review API Module
//!
//! Both rating axes of the per-order review row, plus read models.

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/reviews", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route(
            "/{order_id}",
            get(handler::get_by_order).post(handler::submit_seller_rating),
        )
        .route("/{order_id}/buyer", post(handler::submit_buyer_rating))
        .route("/{order_id}/buyer-rated", get(handler::buyer_rated))
        .route("/seller/{seller_id}", get(handler::list_for_seller))
}
