//! Bid Repository
//!
//! Bid placement debits one token and inserts the bid as a single
//! transaction: a bid never exists without its debit, and a debit never
//! commits without its bid. Placement is idempotent on `client_key`.

use super::{RepoError, RepoResult, token};
use shared::models::{Bid, BidCreate};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

const SELECT_COLS: &str =
    "id, client_key, project_id, seller_id, bid_amount_cents, message, status, created_at";

pub async fn find_by_client_key(pool: &SqlitePool, client_key: &str) -> RepoResult<Option<Bid>> {
    let row = sqlx::query_as::<_, Bid>(&format!(
        "SELECT {SELECT_COLS} FROM bid WHERE client_key = ?"
    ))
    .bind(client_key)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn find_by_project(pool: &SqlitePool, project_id: i64) -> RepoResult<Vec<Bid>> {
    let rows = sqlx::query_as::<_, Bid>(&format!(
        "SELECT {SELECT_COLS} FROM bid WHERE project_id = ? ORDER BY created_at DESC"
    ))
    .bind(project_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_seller(
    pool: &SqlitePool,
    seller_id: i64,
    limit: i32,
    offset: i32,
) -> RepoResult<Vec<Bid>> {
    let rows = sqlx::query_as::<_, Bid>(&format!(
        "SELECT {SELECT_COLS} FROM bid WHERE seller_id = ? ORDER BY created_at DESC LIMIT ? OFFSET ?"
    ))
    .bind(seller_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Place a bid: debit one token and insert the row, atomically. Returns
/// `(bid, true)` when `client_key` was already used (idempotent replay,
/// nothing debited).
pub async fn place(
    pool: &SqlitePool,
    seller_id: i64,
    data: &BidCreate,
) -> RepoResult<(Bid, bool)> {
    // Replay fast path
    if let Some(existing) = find_by_client_key(pool, &data.client_key).await? {
        if existing.seller_id != seller_id {
            return Err(RepoError::Conflict(format!(
                "Bid key {} belongs to another seller",
                data.client_key
            )));
        }
        return Ok((existing, true));
    }

    let mut tx = pool.begin().await?;

    // Guarded debit: fails with InsufficientTokens at balance 0, writing
    // nothing.
    token::debit_one_tx(&mut tx, seller_id).await?;

    let id = snowflake_id();
    let now = now_millis();
    let rows = sqlx::query(
        "INSERT OR IGNORE INTO bid (id, client_key, project_id, seller_id, bid_amount_cents, message, status, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, 'submitted', ?7)",
    )
    .bind(id)
    .bind(&data.client_key)
    .bind(data.project_id)
    .bind(seller_id)
    .bind(data.bid_amount_cents)
    .bind(&data.message)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    if rows.rows_affected() == 0 {
        // Lost a race on the same client_key: roll the debit back and hand
        // back the winner's row.
        tx.rollback().await?;
        let existing = find_by_client_key(pool, &data.client_key)
            .await?
            .ok_or_else(|| RepoError::Database("Bid row missing after conflict".into()))?;
        if existing.seller_id != seller_id {
            return Err(RepoError::Conflict(format!(
                "Bid key {} belongs to another seller",
                data.client_key
            )));
        }
        return Ok((existing, true));
    }

    tx.commit().await?;

    let bid = find_by_client_key(pool, &data.client_key)
        .await?
        .ok_or_else(|| RepoError::Database("Bid row missing after insert".into()))?;
    Ok((bid, false))
}
