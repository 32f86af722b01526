//! Review Repository
//!
//! One review row per order, keyed by a UNIQUE constraint on `order_id`,
//! carrying two independently written rating axes. Each axis lands as a
//! single atomic "insert if absent, else update the axis" statement whose
//! DO UPDATE is predicated on the axis still being null — never as a read
//! followed by a conditional insert/update. Zero rows affected means the
//! axis was already written.

use super::{RepoError, RepoResult, notification};
use shared::models::{NotificationCreate, NotificationKind, Order, OrderStatus, Review};
use shared::util::{now_millis, snowflake_id};
use sqlx::{Sqlite, SqlitePool, Transaction};

const SELECT_COLS: &str = "id, order_id, reviewer_id, reviewee_id, rating, comment, submitted_at, \
     buyer_rating, buyer_comment, buyer_rated_at, created_at, updated_at";

pub async fn find_by_order(pool: &SqlitePool, order_id: i64) -> RepoResult<Option<Review>> {
    let row = sqlx::query_as::<_, Review>(&format!(
        "SELECT {SELECT_COLS} FROM review WHERE order_id = ?"
    ))
    .bind(order_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Read model: has the provider rated this order's buyer yet?
pub async fn buyer_rated(pool: &SqlitePool, order_id: i64) -> RepoResult<bool> {
    let rated: Option<bool> =
        sqlx::query_scalar("SELECT buyer_rating IS NOT NULL FROM review WHERE order_id = ?")
            .bind(order_id)
            .fetch_optional(pool)
            .await?;
    Ok(rated.unwrap_or(false))
}

/// Seller ratings received, for profile display. Rows whose seller axis is
/// still unwritten are excluded.
pub async fn find_for_seller(
    pool: &SqlitePool,
    seller_id: i64,
    limit: i32,
    offset: i32,
) -> RepoResult<Vec<Review>> {
    let rows = sqlx::query_as::<_, Review>(&format!(
        "SELECT {SELECT_COLS} FROM review WHERE reviewee_id = ? AND rating IS NOT NULL \
         ORDER BY submitted_at DESC LIMIT ? OFFSET ?"
    ))
    .bind(seller_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

async fn load_completed_order(
    tx: &mut Transaction<'_, Sqlite>,
    order_id: i64,
) -> RepoResult<Order> {
    let order = sqlx::query_as::<_, Order>(&format!(
        "SELECT id, title, description, price_cents, currency, status, buyer_id, provider_id, \
         delivery_date, delivered_at, completed_at, buyer_accepted, created_at, updated_at \
         FROM orders WHERE id = ?"
    ))
    .bind(order_id)
    .fetch_optional(&mut **tx)
    .await?
    .ok_or_else(|| RepoError::NotFound(format!("Order {order_id} not found")))?;

    if order.status != OrderStatus::Completed {
        return Err(RepoError::InvalidState(format!(
            "Order {order_id} is not completed; ratings open after completion"
        )));
    }
    Ok(order)
}

/// Buyer rates the seller. Write-once: a second submission is rejected by
/// the upsert guard, not by a prior read.
pub async fn submit_seller_rating(
    pool: &SqlitePool,
    order_id: i64,
    actor_id: i64,
    rating: i32,
    comment: &str,
) -> RepoResult<Review> {
    let mut tx = pool.begin().await?;

    let order = load_completed_order(&mut tx, order_id).await?;
    if order.buyer_id != actor_id {
        return Err(RepoError::Forbidden(format!(
            "User {actor_id} is not the buyer of order {order_id}"
        )));
    }

    let now = now_millis();
    let rows = sqlx::query(
        "INSERT INTO review (id, order_id, reviewer_id, reviewee_id, rating, comment, submitted_at, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7, ?7) \
         ON CONFLICT(order_id) DO UPDATE SET \
             rating = excluded.rating, \
             comment = excluded.comment, \
             submitted_at = excluded.submitted_at, \
             updated_at = excluded.updated_at \
         WHERE review.rating IS NULL",
    )
    .bind(snowflake_id())
    .bind(order_id)
    .bind(order.buyer_id)
    .bind(order.provider_id)
    .bind(rating)
    .bind(comment)
    .bind(now)
    .execute(&mut *tx)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::Conflict(format!(
            "Order {order_id} already has a seller rating"
        )));
    }

    notification::insert_tx(
        &mut tx,
        NotificationCreate {
            user_id: order.provider_id,
            title: "New rating received".to_string(),
            description: format!("The buyer rated order \"{}\"", order.title),
            kind: NotificationKind::ReviewReceived,
            related_id: order_id,
        },
    )
    .await?;

    tx.commit().await?;

    find_by_order(pool, order_id)
        .await?
        .ok_or_else(|| RepoError::Database("Review row missing after upsert".into()))
}

/// Provider rates the buyer. Independent of the seller axis and also
/// write-once; the ledger enforces this itself rather than trusting the
/// caller's prior-write check.
pub async fn submit_buyer_rating(
    pool: &SqlitePool,
    order_id: i64,
    actor_id: i64,
    rating: i32,
    comment: Option<&str>,
) -> RepoResult<Review> {
    let mut tx = pool.begin().await?;

    let order = load_completed_order(&mut tx, order_id).await?;
    if order.provider_id != actor_id {
        return Err(RepoError::Forbidden(format!(
            "User {actor_id} is not the provider of order {order_id}"
        )));
    }

    let now = now_millis();
    let rows = sqlx::query(
        "INSERT INTO review (id, order_id, reviewer_id, reviewee_id, buyer_rating, buyer_comment, buyer_rated_at, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7, ?7) \
         ON CONFLICT(order_id) DO UPDATE SET \
             buyer_rating = excluded.buyer_rating, \
             buyer_comment = excluded.buyer_comment, \
             buyer_rated_at = excluded.buyer_rated_at, \
             updated_at = excluded.updated_at \
         WHERE review.buyer_rating IS NULL",
    )
    .bind(snowflake_id())
    .bind(order_id)
    .bind(order.buyer_id)
    .bind(order.provider_id)
    .bind(rating)
    .bind(comment)
    .bind(now)
    .execute(&mut *tx)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::Conflict(format!(
            "Order {order_id} already has a buyer rating"
        )));
    }

    notification::insert_tx(
        &mut tx,
        NotificationCreate {
            user_id: order.buyer_id,
            title: "New rating received".to_string(),
            description: format!("The seller rated you on order \"{}\"", order.title),
            kind: NotificationKind::ReviewReceived,
            related_id: order_id,
        },
    )
    .await?;

    tx.commit().await?;

    find_by_order(pool, order_id)
        .await?
        .ok_or_else(|| RepoError::Database("Review row missing after upsert".into()))
}
