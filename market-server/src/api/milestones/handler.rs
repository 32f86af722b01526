//! Milestone API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{milestone, order};
use crate::utils::validation::{
    MAX_NOTE_LEN, MAX_TITLE_LEN, validate_amount_cents, validate_future_date,
    validate_required_text,
};
use crate::utils::{AppError, AppResult};
use shared::models::{Milestone, MilestoneBatch, MilestoneBatchResult};
use shared::util::now_millis;

/// GET /api/engagements/:id/milestones - parties of the engagement only
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(engagement_id): Path<i64>,
) -> AppResult<Json<Vec<Milestone>>> {
    let engagement = order::find_by_id(&state.pool, engagement_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Engagement {engagement_id} not found")))?;
    if engagement.buyer_id != user.id && engagement.provider_id != user.id {
        return Err(AppError::forbidden(format!(
            "User {} is not a party of engagement {engagement_id}",
            user.id
        )));
    }

    let milestones = milestone::find_by_engagement(&state.pool, engagement_id).await?;
    Ok(Json(milestones))
}

/// PUT /api/engagements/:id/milestones - all-or-nothing batch upsert,
/// seller only
pub async fn upsert_batch(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(engagement_id): Path<i64>,
    Json(payload): Json<MilestoneBatch>,
) -> AppResult<Json<MilestoneBatchResult>> {
    if payload.items.is_empty() {
        return Err(AppError::validation("milestone batch must not be empty"));
    }

    // Validate the whole batch before any write: one bad item rejects all
    let now = now_millis();
    for (i, item) in payload.items.iter().enumerate() {
        let field = |name: &str| format!("items[{i}].{name}");
        validate_required_text(&item.title, &field("title"), MAX_TITLE_LEN)?;
        validate_required_text(&item.description, &field("description"), MAX_NOTE_LEN)?;
        validate_amount_cents(item.amount_cents, &field("amount"))?;
        validate_future_date(item.due_date, now, &field("due_date"))?;
    }

    let result =
        milestone::upsert_batch(&state.pool, engagement_id, user.id, &payload.items).await?;
    Ok(Json(result))
}
