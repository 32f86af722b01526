//! Seller Plus Subscription Repository
//!
//! Flat-rate subscription, independent of the token ledger. Purchase is
//! idempotent while a subscription is active: the insert itself is guarded
//! by a NOT EXISTS predicate, so two racing purchases commit one row.

use super::{RepoError, RepoResult};
use shared::models::{
    SELLER_PLUS_DURATION_MS, SellerPlusPurchase, SellerPlusSubscription, Service,
};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

const SELECT_COLS: &str = "id, seller_id, started_at, expires_at, created_at";

pub async fn find_active(
    pool: &SqlitePool,
    seller_id: i64,
    now: i64,
) -> RepoResult<Option<SellerPlusSubscription>> {
    let row = sqlx::query_as::<_, SellerPlusSubscription>(&format!(
        "SELECT {SELECT_COLS} FROM seller_plus_subscription \
         WHERE seller_id = ? AND expires_at > ? ORDER BY expires_at DESC LIMIT 1"
    ))
    .bind(seller_id)
    .bind(now)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Purchase Seller Plus: insert a 30-day subscription and flag the seller's
/// services featured, in one transaction. A purchase while a subscription
/// is active is a no-op success returning the active one.
pub async fn purchase(pool: &SqlitePool, seller_id: i64) -> RepoResult<SellerPlusPurchase> {
    let now = now_millis();
    let expires_at = now + SELLER_PLUS_DURATION_MS;

    let mut tx = pool.begin().await?;

    // Conditional insert: the active-subscription check is part of the
    // statement, not a separate read.
    let rows = sqlx::query(
        "INSERT INTO seller_plus_subscription (id, seller_id, started_at, expires_at, created_at) \
         SELECT ?1, ?2, ?3, ?4, ?3 \
         WHERE NOT EXISTS (SELECT 1 FROM seller_plus_subscription WHERE seller_id = ?2 AND expires_at > ?3)",
    )
    .bind(snowflake_id())
    .bind(seller_id)
    .bind(now)
    .bind(expires_at)
    .execute(&mut *tx)
    .await?;

    if rows.rows_affected() == 0 {
        tx.rollback().await?;
        let active = find_active(pool, seller_id, now).await?.ok_or_else(|| {
            RepoError::Database("Active subscription vanished during purchase".into())
        })?;
        return Ok(SellerPlusPurchase {
            subscription: active,
            newly_created: false,
        });
    }

    sqlx::query("UPDATE service SET is_featured = 1 WHERE seller_id = ?")
        .bind(seller_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    let subscription = find_active(pool, seller_id, now)
        .await?
        .ok_or_else(|| RepoError::Database("Subscription row missing after insert".into()))?;
    Ok(SellerPlusPurchase {
        subscription,
        newly_created: true,
    })
}

// ── Service listings (featured flag target) ─────────────────────────

pub async fn find_services(pool: &SqlitePool, seller_id: i64) -> RepoResult<Vec<Service>> {
    let rows = sqlx::query_as::<_, Service>(
        "SELECT id, seller_id, title, is_featured, created_at FROM service \
         WHERE seller_id = ? ORDER BY created_at DESC",
    )
    .bind(seller_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn create_service(
    pool: &SqlitePool,
    seller_id: i64,
    title: &str,
) -> RepoResult<Service> {
    let id = snowflake_id();
    let now = now_millis();

    // New listings inherit the featured flag from an active subscription
    let featured = find_active(pool, seller_id, now).await?.is_some();

    sqlx::query(
        "INSERT INTO service (id, seller_id, title, is_featured, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
    )
    .bind(id)
    .bind(seller_id)
    .bind(title)
    .bind(featured)
    .bind(now)
    .execute(pool)
    .await?;

    let row = sqlx::query_as::<_, Service>(
        "SELECT id, seller_id, title, is_featured, created_at FROM service WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| RepoError::Database("Failed to create service".into()))?;
    Ok(row)
}
