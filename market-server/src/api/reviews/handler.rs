//! Review API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::api::ListQuery;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::review;
use crate::utils::validation::{
    MAX_NOTE_LEN, validate_optional_text, validate_rating, validate_required_text,
};
use crate::utils::{AppError, AppResult};
use shared::models::{BuyerRatingSubmit, Review, ReviewSubmit};

/// GET /api/reviews/:order_id
pub async fn get_by_order(
    State(state): State<ServerState>,
    _user: CurrentUser,
    Path(order_id): Path<i64>,
) -> AppResult<Json<Review>> {
    let r = review::find_by_order(&state.pool, order_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("No review for order {order_id}")))?;
    Ok(Json(r))
}

/// POST /api/reviews/:order_id - buyer rates the seller (write-once)
pub async fn submit_seller_rating(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(order_id): Path<i64>,
    Json(payload): Json<ReviewSubmit>,
) -> AppResult<Json<Review>> {
    validate_rating(payload.rating)?;
    validate_required_text(&payload.comment, "comment", MAX_NOTE_LEN)?;

    let r = review::submit_seller_rating(
        &state.pool,
        order_id,
        user.id,
        payload.rating,
        &payload.comment,
    )
    .await?;
    Ok(Json(r))
}

/// POST /api/reviews/:order_id/buyer - provider rates the buyer
/// (write-once, independent of the seller axis)
pub async fn submit_buyer_rating(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(order_id): Path<i64>,
    Json(payload): Json<BuyerRatingSubmit>,
) -> AppResult<Json<Review>> {
    validate_rating(payload.rating)?;
    validate_optional_text(&payload.comment, "comment", MAX_NOTE_LEN)?;

    let r = review::submit_buyer_rating(
        &state.pool,
        order_id,
        user.id,
        payload.rating,
        payload.comment.as_deref(),
    )
    .await?;
    Ok(Json(r))
}

/// GET /api/reviews/:order_id/buyer-rated - derived read model
pub async fn buyer_rated(
    State(state): State<ServerState>,
    _user: CurrentUser,
    Path(order_id): Path<i64>,
) -> AppResult<Json<bool>> {
    let rated = review::buyer_rated(&state.pool, order_id).await?;
    Ok(Json(rated))
}

/// GET /api/reviews/seller/:seller_id - ratings a seller has received
pub async fn list_for_seller(
    State(state): State<ServerState>,
    _user: CurrentUser,
    Path(seller_id): Path<i64>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Review>>> {
    let reviews =
        review::find_for_seller(&state.pool, seller_id, query.limit, query.offset).await?;
    Ok(Json(reviews))
}
