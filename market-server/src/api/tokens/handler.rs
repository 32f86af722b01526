//! Token API Handlers

use axum::{
    Json,
    extract::{Query, State},
};

use crate::api::{ListQuery, ensure_role};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::token;
use crate::utils::{AppError, AppResult};
use shared::models::{TokenPlan, TokenPurchase, TokenPurchaseRequest};

/// GET /api/tokens/balance - own balance (zero before first purchase)
pub async fn balance(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<i64>> {
    ensure_role(&user, "seller")?;
    let balance = token::balance_of(&state.pool, user.id).await?;
    Ok(Json(balance))
}

/// GET /api/tokens/plans - active plans
pub async fn plans(
    State(state): State<ServerState>,
    _user: CurrentUser,
) -> AppResult<Json<Vec<TokenPlan>>> {
    let plans = token::find_active_plans(&state.pool).await?;
    Ok(Json(plans))
}

/// POST /api/tokens/purchase - credit a plan's tokens, idempotent on
/// `attempt_id`
pub async fn purchase(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<TokenPurchaseRequest>,
) -> AppResult<Json<TokenPurchase>> {
    ensure_role(&user, "seller")?;
    if payload.attempt_id.trim().is_empty() {
        return Err(AppError::validation("attempt_id must not be empty"));
    }

    let plan = token::find_plan(&state.pool, payload.plan_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Token plan {} not found", payload.plan_id)))?;

    let (purchase, replayed) =
        token::purchase(&state.pool, user.id, &plan, &payload.attempt_id).await?;
    if replayed {
        tracing::info!(
            seller_id = user.id,
            attempt_id = %payload.attempt_id,
            "Token purchase replayed, no credit applied"
        );
    }
    Ok(Json(purchase))
}

/// GET /api/tokens/purchases - own purchase history
pub async fn purchases(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<TokenPurchase>>> {
    ensure_role(&user, "seller")?;
    let rows = token::find_purchases(&state.pool, user.id, query.limit, query.offset).await?;
    Ok(Json(rows))
}
