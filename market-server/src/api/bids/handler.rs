//! Bid API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::api::{ListQuery, ensure_role};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::bid;
use crate::utils::validation::{MAX_NOTE_LEN, validate_amount_cents, validate_required_text};
use crate::utils::{AppError, AppResult};
use shared::models::{Bid, BidCreate};

/// POST /api/bids - place a bid; debits one token atomically with the
/// insert, idempotent on `client_key`
pub async fn place(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<BidCreate>,
) -> AppResult<Json<Bid>> {
    ensure_role(&user, "seller")?;
    validate_amount_cents(payload.bid_amount_cents, "bid amount")?;
    validate_required_text(&payload.message, "message", MAX_NOTE_LEN)?;
    if payload.client_key.trim().is_empty() {
        return Err(AppError::validation("client_key must not be empty"));
    }

    let (placed, replayed) = bid::place(&state.pool, user.id, &payload).await?;
    if replayed {
        tracing::info!(
            seller_id = user.id,
            client_key = %payload.client_key,
            "Bid placement replayed, no debit applied"
        );
    }
    Ok(Json(placed))
}

/// GET /api/bids/mine - own bids
pub async fn list_mine(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Bid>>> {
    ensure_role(&user, "seller")?;
    let bids = bid::find_by_seller(&state.pool, user.id, query.limit, query.offset).await?;
    Ok(Json(bids))
}

/// GET /api/bids/project/:project_id - bids against a project
pub async fn list_by_project(
    State(state): State<ServerState>,
    _user: CurrentUser,
    Path(project_id): Path<i64>,
) -> AppResult<Json<Vec<Bid>>> {
    let bids = bid::find_by_project(&state.pool, project_id).await?;
    Ok(Json(bids))
}
