//! HTTP API
//!
//! One router module per resource, each nesting under `/api/...`, merged
//! here. `build_app` stacks the shared middleware on top.

use axum::Router;
use http::{HeaderName, HeaderValue};
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::{AppError, AppResult};

pub mod bids;
pub mod health;
pub mod milestones;
pub mod notifications;
pub mod orders;
pub mod reviews;
pub mod seller_plus;
pub mod tokens;

/// Query params for paginated listings
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    pub limit: i32,
    #[serde(default)]
    pub offset: i32,
}

fn default_limit() -> i32 {
    50
}

/// Per-handler role gate. Admin passes everywhere.
pub fn ensure_role(user: &CurrentUser, role: &str) -> AppResult<()> {
    if user.role == role || user.role == "admin" {
        Ok(())
    } else {
        Err(AppError::forbidden(format!(
            "User {} lacks role {role}",
            user.id
        )))
    }
}

/// Custom request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        Some(RequestId::new(HeaderValue::from_str(&id).unwrap()))
    }
}

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(orders::router())
        .merge(milestones::router())
        .merge(reviews::router())
        .merge(tokens::router())
        .merge(bids::router())
        .merge(seller_plus::router())
        .merge(notifications::router())
        // Health API - public route
        .merge(health::router())
}

/// Build a fully configured application with all middleware
pub fn build_app(_state: &ServerState) -> Router<ServerState> {
    build_router()
        // CORS - handle cross-origin requests
        .layer(CorsLayer::permissive())
        // Trace - request tracing (logs at INFO level)
        .layer(TraceLayer::new_for_http())
        // Request ID - generate a unique ID for each request
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static("x-request-id"),
            XRequestId,
        ))
        // Propagate request ID to response
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            "x-request-id",
        )))
}
