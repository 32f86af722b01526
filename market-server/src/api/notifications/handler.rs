//! Notification API Handlers

use axum::{
    Json,
    extract::{Query, State},
};

use crate::api::ListQuery;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::notification;
use crate::utils::AppResult;
use shared::models::Notification;

/// GET /api/notifications - own feed, newest first
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Notification>>> {
    let rows =
        notification::find_by_user(&state.pool, user.id, query.limit, query.offset).await?;
    Ok(Json(rows))
}
