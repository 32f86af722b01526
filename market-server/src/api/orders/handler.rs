//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::api::ensure_role;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::order;
use crate::services::payment;
use crate::utils::validation::{
    MAX_NOTE_LEN, MAX_TITLE_LEN, validate_amount_cents, validate_required_text,
};
use crate::utils::{AppError, AppResult};
use shared::models::{DeliverySubmit, Order, OrderCreate, OrderStatus, OrderTransition};

/// Query params for listing orders
#[derive(Debug, Deserialize)]
pub struct OrderListQuery {
    #[serde(default = "default_limit")]
    pub limit: i32,
    #[serde(default)]
    pub offset: i32,
    /// Platform-wide status filter (admin only)
    pub status: Option<OrderStatus>,
}

fn default_limit() -> i32 {
    50
}

/// GET /api/orders - own orders, or platform-wide by status (admin)
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<Vec<Order>>> {
    let orders = match query.status {
        Some(status) => {
            ensure_role(&user, "admin")?;
            order::find_by_status(&state.pool, status, query.limit, query.offset).await?
        }
        None => order::find_by_party(&state.pool, user.id, query.limit, query.offset).await?,
    };
    Ok(Json(orders))
}

/// POST /api/orders - create an order (platform-side, on offer acceptance)
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Json<Order>> {
    ensure_role(&user, "admin")?;
    validate_required_text(&payload.title, "title", MAX_TITLE_LEN)?;
    validate_required_text(&payload.description, "description", MAX_NOTE_LEN)?;
    validate_amount_cents(payload.price_cents, "price")?;
    if payload.buyer_id == payload.provider_id {
        return Err(AppError::validation(
            "buyer and provider must be different users",
        ));
    }

    let created = order::create(&state.pool, payload).await?;
    Ok(Json(created))
}

/// GET /api/orders/:id - order detail, parties only
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Order>> {
    let o = order::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {} not found", id)))?;
    if o.buyer_id != user.id && o.provider_id != user.id && user.role != "admin" {
        return Err(AppError::forbidden(format!(
            "User {} is not a party of order {id}",
            user.id
        )));
    }
    Ok(Json(o))
}

/// POST /api/orders/:id/delivery - provider hands over the work
pub async fn submit_delivery(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<DeliverySubmit>,
) -> AppResult<Json<Order>> {
    validate_required_text(&payload.note, "note", MAX_NOTE_LEN)?;
    let o = order::submit_delivery(&state.pool, id, user.id, &payload.note).await?;
    Ok(Json(o))
}

/// POST /api/orders/:id/accept - buyer accepts the delivery; the only path
/// into `completed`
pub async fn accept_delivery(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Order>> {
    let o = order::accept_delivery(&state.pool, id, user.id).await?;
    Ok(Json(o))
}

/// POST /api/orders/:id/transition - manual move along the chain or cancel
pub async fn transition(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<OrderTransition>,
) -> AppResult<Json<Order>> {
    let o = order::transition(&state.pool, id, user.id, payload.status).await?;
    Ok(Json(o))
}

/// Query params for the payment link stub
#[derive(Debug, Deserialize)]
pub struct PaymentLinkQuery {
    #[serde(default = "default_method")]
    pub method: String,
}

fn default_method() -> String {
    "card".to_string()
}

/// GET /api/orders/:id/payment-link - opaque checkout URL (stub; no
/// callback path)
pub async fn payment_link(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Query(query): Query<PaymentLinkQuery>,
) -> AppResult<Json<String>> {
    let o = order::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {} not found", id)))?;
    if o.buyer_id != user.id && o.provider_id != user.id {
        return Err(AppError::forbidden(format!(
            "User {} is not a party of order {id}",
            user.id
        )));
    }
    Ok(Json(payment::payment_link(
        o.id,
        &query.method,
        o.price_cents,
    )))
}
