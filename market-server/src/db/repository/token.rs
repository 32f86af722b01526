//! Token Ledger Repository
//!
//! The balance is a per-seller counter that only moves through guarded
//! atomic statements: credits go through the purchase upsert, debits
//! through [`debit_one_tx`] with a `balance >= 1` floor in the predicate.
//! The application layer never computes a balance and writes it back.

use super::{RepoError, RepoResult};
use shared::models::{TokenBalance, TokenPlan, TokenPurchase};
use shared::util::{now_millis, snowflake_id};
use sqlx::{Sqlite, SqlitePool, Transaction};

const PURCHASE_COLS: &str =
    "id, attempt_id, seller_id, plan_id, tokens, amount_cents, currency, status, created_at";

pub async fn find_balance(pool: &SqlitePool, seller_id: i64) -> RepoResult<Option<TokenBalance>> {
    let row = sqlx::query_as::<_, TokenBalance>(
        "SELECT seller_id, balance, updated_at FROM token_balance WHERE seller_id = ?",
    )
    .bind(seller_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Current balance, zero for sellers with no ledger row yet.
pub async fn balance_of(pool: &SqlitePool, seller_id: i64) -> RepoResult<i64> {
    Ok(find_balance(pool, seller_id).await?.map_or(0, |b| b.balance))
}

pub async fn find_plan(pool: &SqlitePool, plan_id: i64) -> RepoResult<Option<TokenPlan>> {
    let plan = sqlx::query_as::<_, TokenPlan>(
        "SELECT id, name, tokens, price_cents, currency, is_active FROM token_plan \
         WHERE id = ? AND is_active = 1",
    )
    .bind(plan_id)
    .fetch_optional(pool)
    .await?;
    Ok(plan)
}

pub async fn find_active_plans(pool: &SqlitePool) -> RepoResult<Vec<TokenPlan>> {
    let plans = sqlx::query_as::<_, TokenPlan>(
        "SELECT id, name, tokens, price_cents, currency, is_active FROM token_plan \
         WHERE is_active = 1 ORDER BY tokens",
    )
    .fetch_all(pool)
    .await?;
    Ok(plans)
}

pub async fn find_purchase_by_attempt(
    pool: &SqlitePool,
    attempt_id: &str,
) -> RepoResult<Option<TokenPurchase>> {
    let row = sqlx::query_as::<_, TokenPurchase>(&format!(
        "SELECT {PURCHASE_COLS} FROM token_purchase WHERE attempt_id = ?"
    ))
    .bind(attempt_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn find_purchases(
    pool: &SqlitePool,
    seller_id: i64,
    limit: i32,
    offset: i32,
) -> RepoResult<Vec<TokenPurchase>> {
    let rows = sqlx::query_as::<_, TokenPurchase>(&format!(
        "SELECT {PURCHASE_COLS} FROM token_purchase WHERE seller_id = ? \
         ORDER BY created_at DESC LIMIT ? OFFSET ?"
    ))
    .bind(seller_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Credit a plan's tokens against a seller's balance, with the audit row in
/// the same transaction. Keyed by `attempt_id`: a replayed attempt returns
/// the original purchase without crediting again.
pub async fn purchase(
    pool: &SqlitePool,
    seller_id: i64,
    plan: &TokenPlan,
    attempt_id: &str,
) -> RepoResult<(TokenPurchase, bool)> {
    let mut tx = pool.begin().await?;

    let now = now_millis();
    let rows = sqlx::query(
        "INSERT OR IGNORE INTO token_purchase (id, attempt_id, seller_id, plan_id, tokens, amount_cents, currency, status, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 'completed', ?8)",
    )
    .bind(snowflake_id())
    .bind(attempt_id)
    .bind(seller_id)
    .bind(plan.id)
    .bind(plan.tokens)
    .bind(plan.price_cents)
    .bind(&plan.currency)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    if rows.rows_affected() == 0 {
        // Replay: hand back the original audit row, no credit
        tx.rollback().await?;
        let existing = find_purchase_by_attempt(pool, attempt_id)
            .await?
            .ok_or_else(|| RepoError::Database("Purchase attempt row missing".into()))?;
        if existing.seller_id != seller_id {
            return Err(RepoError::Conflict(format!(
                "Purchase attempt {attempt_id} belongs to another seller"
            )));
        }
        return Ok((existing, true));
    }

    sqlx::query(
        "INSERT INTO token_balance (seller_id, balance, updated_at) VALUES (?1, ?2, ?3) \
         ON CONFLICT(seller_id) DO UPDATE SET \
             balance = balance + excluded.balance, \
             updated_at = excluded.updated_at",
    )
    .bind(seller_id)
    .bind(plan.tokens)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    let created = find_purchase_by_attempt(pool, attempt_id)
        .await?
        .ok_or_else(|| RepoError::Database("Purchase row missing after insert".into()))?;
    Ok((created, false))
}

/// Debit one token inside the caller's transaction. The `balance >= 1`
/// floor lives in the predicate, so a concurrent debit that drains the
/// balance makes this affect zero rows.
pub async fn debit_one_tx(tx: &mut Transaction<'_, Sqlite>, seller_id: i64) -> RepoResult<()> {
    let now = now_millis();
    let rows = sqlx::query(
        "UPDATE token_balance SET balance = balance - 1, updated_at = ?1 \
         WHERE seller_id = ?2 AND balance >= 1",
    )
    .bind(now)
    .bind(seller_id)
    .execute(&mut **tx)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::InsufficientTokens);
    }
    Ok(())
}
