//! Notification outbox tests
//!
//! Intents land in the same commit as the state change; the worker stamps
//! them dispatched afterwards and never touches the primary mutation.

use market_server::db::DbService;
use market_server::db::repository::{notification, order};
use market_server::notify::OutboxWorker;
use shared::models::OrderCreate;
use sqlx::SqlitePool;

const BUYER: i64 = 1;
const PROVIDER: i64 = 2;

async fn memory_pool() -> SqlitePool {
    DbService::open_in_memory().await.unwrap().pool
}

async fn deliver_once(pool: &SqlitePool) {
    let o = order::create(
        pool,
        OrderCreate {
            title: "Voiceover".to_string(),
            description: "60s spot".to_string(),
            price_cents: 15_000,
            currency: None,
            buyer_id: BUYER,
            provider_id: PROVIDER,
            delivery_date: None,
        },
    )
    .await
    .unwrap();
    order::submit_delivery(pool, o.id, PROVIDER, "take 3 attached")
        .await
        .unwrap();
}

#[tokio::test]
async fn state_changes_leave_undispatched_rows() {
    let pool = memory_pool().await;
    deliver_once(&pool).await;

    let pending = notification::find_undispatched(&pool, 10).await.unwrap();
    assert_eq!(pending.len(), 1);
    assert!(!pending[0].dispatched);
    assert!(pending[0].dispatched_at.is_none());
}

#[tokio::test]
async fn drain_stamps_rows_dispatched() {
    let pool = memory_pool().await;
    deliver_once(&pool).await;

    let worker = OutboxWorker::new(pool.clone());
    let dispatched = worker.drain().await.unwrap();
    assert_eq!(dispatched, 1);

    // Nothing pending, feed row stamped
    assert!(notification::find_undispatched(&pool, 10).await.unwrap().is_empty());
    let feed = notification::find_by_user(&pool, BUYER, 10, 0).await.unwrap();
    assert_eq!(feed.len(), 1);
    assert!(feed[0].dispatched);
    assert!(feed[0].dispatched_at.is_some());

    // A second sweep finds nothing
    assert_eq!(worker.drain().await.unwrap(), 0);
}

#[tokio::test]
async fn mark_dispatched_is_idempotent() {
    let pool = memory_pool().await;
    deliver_once(&pool).await;

    let pending = notification::find_undispatched(&pool, 10).await.unwrap();
    let id = pending[0].id;

    assert!(notification::mark_dispatched(&pool, id).await.unwrap());
    assert!(!notification::mark_dispatched(&pool, id).await.unwrap());
}
