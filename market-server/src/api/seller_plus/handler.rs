//! Seller Plus API Handlers

use axum::{Json, extract::State};
use serde::Deserialize;

use crate::api::ensure_role;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::subscription;
use crate::utils::AppResult;
use crate::utils::validation::{MAX_TITLE_LEN, validate_required_text};
use shared::models::{SellerPlusPurchase, SellerPlusSubscription, Service};
use shared::util::now_millis;

/// POST /api/seller-plus/purchase - 30-day subscription; a purchase while
/// one is active is an idempotent no-op
pub async fn purchase(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<SellerPlusPurchase>> {
    ensure_role(&user, "seller")?;
    let result = subscription::purchase(&state.pool, user.id).await?;
    if !result.newly_created {
        tracing::info!(seller_id = user.id, "Seller Plus already active, no-op");
    }
    Ok(Json(result))
}

/// GET /api/seller-plus/status - active subscription, if any
pub async fn status(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Option<SellerPlusSubscription>>> {
    ensure_role(&user, "seller")?;
    let sub = subscription::find_active(&state.pool, user.id, now_millis()).await?;
    Ok(Json(sub))
}

/// Create service payload
#[derive(Debug, Deserialize)]
pub struct ServiceCreate {
    pub title: String,
}

/// POST /api/seller-plus/services - create a service listing
pub async fn create_service(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<ServiceCreate>,
) -> AppResult<Json<Service>> {
    ensure_role(&user, "seller")?;
    validate_required_text(&payload.title, "title", MAX_TITLE_LEN)?;
    let service = subscription::create_service(&state.pool, user.id, &payload.title).await?;
    Ok(Json(service))
}

/// GET /api/seller-plus/services - own service listings
pub async fn list_services(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<Service>>> {
    ensure_role(&user, "seller")?;
    let services = subscription::find_services(&state.pool, user.id).await?;
    Ok(Json(services))
}
