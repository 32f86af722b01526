//! Notification Outbox Repository
//!
//! Inserts run inside the transaction of the state change they describe;
//! the dispatch worker drains undispatched rows afterwards.

use super::RepoResult;
use shared::models::{Notification, NotificationCreate};
use shared::util::{now_millis, snowflake_id};
use sqlx::{Sqlite, SqlitePool, Transaction};

const SELECT_COLS: &str = "id, user_id, title, description, kind, related_id, \
     dispatched, created_at, dispatched_at";

/// Insert a notification intent inside the caller's transaction.
pub async fn insert_tx(
    tx: &mut Transaction<'_, Sqlite>,
    data: NotificationCreate,
) -> RepoResult<i64> {
    let id = snowflake_id();
    let now = now_millis();
    sqlx::query(
        "INSERT INTO notification (id, user_id, title, description, kind, related_id, dispatched, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, ?7)",
    )
    .bind(id)
    .bind(data.user_id)
    .bind(&data.title)
    .bind(&data.description)
    .bind(data.kind)
    .bind(data.related_id)
    .bind(now)
    .execute(&mut **tx)
    .await?;
    Ok(id)
}

/// A user's notification feed, newest first.
pub async fn find_by_user(
    pool: &SqlitePool,
    user_id: i64,
    limit: i32,
    offset: i32,
) -> RepoResult<Vec<Notification>> {
    let rows = sqlx::query_as::<_, Notification>(&format!(
        "SELECT {SELECT_COLS} FROM notification WHERE user_id = ? ORDER BY created_at DESC LIMIT ? OFFSET ?"
    ))
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Oldest undispatched rows, for the outbox worker.
pub async fn find_undispatched(pool: &SqlitePool, limit: i32) -> RepoResult<Vec<Notification>> {
    let rows = sqlx::query_as::<_, Notification>(&format!(
        "SELECT {SELECT_COLS} FROM notification WHERE dispatched = 0 ORDER BY created_at LIMIT ?"
    ))
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Stamp a row dispatched. Idempotent: a second call affects zero rows.
pub async fn mark_dispatched(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let now = now_millis();
    let rows = sqlx::query(
        "UPDATE notification SET dispatched = 1, dispatched_at = ?1 WHERE id = ?2 AND dispatched = 0",
    )
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}
