//! Order lifecycle tests
//!
//! Transitions only move along the chain or into cancelled; completion is
//! reached exclusively through delivery followed by buyer acceptance.

use market_server::db::DbService;
use market_server::db::repository::{RepoError, notification, order};
use shared::models::{NotificationKind, Order, OrderCreate, OrderStatus};
use sqlx::SqlitePool;

const BUYER: i64 = 101;
const PROVIDER: i64 = 202;
const STRANGER: i64 = 999;

async fn memory_pool() -> SqlitePool {
    DbService::open_in_memory().await.unwrap().pool
}

async fn seed_order(pool: &SqlitePool) -> Order {
    order::create(
        pool,
        OrderCreate {
            title: "Logo design".to_string(),
            description: "Three concepts, two revision rounds".to_string(),
            price_cents: 25_000,
            currency: None,
            buyer_id: BUYER,
            provider_id: PROVIDER,
            delivery_date: None,
        },
    )
    .await
    .unwrap()
}

#[tokio::test]
async fn create_starts_pending() {
    let pool = memory_pool().await;
    let o = seed_order(&pool).await;

    assert_eq!(o.status, OrderStatus::Pending);
    assert!(o.completed_at.is_none());
    assert!(o.delivered_at.is_none());
    assert!(!o.buyer_accepted);
}

#[tokio::test]
async fn transitions_follow_the_chain() {
    let pool = memory_pool().await;
    let o = seed_order(&pool).await;

    // pending -> revision skips a stage
    let err = order::transition(&pool, o.id, PROVIDER, OrderStatus::Revision)
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::InvalidState(_)));

    let o2 = order::transition(&pool, o.id, PROVIDER, OrderStatus::InProgress)
        .await
        .unwrap();
    assert_eq!(o2.status, OrderStatus::InProgress);

    let o3 = order::transition(&pool, o.id, BUYER, OrderStatus::Revision)
        .await
        .unwrap();
    assert_eq!(o3.status, OrderStatus::Revision);

    // Rework round goes back to in_progress
    let o4 = order::transition(&pool, o.id, PROVIDER, OrderStatus::InProgress)
        .await
        .unwrap();
    assert_eq!(o4.status, OrderStatus::InProgress);

    // completed is never a manual target
    let err = order::transition(&pool, o.id, PROVIDER, OrderStatus::Completed)
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::InvalidState(_)));
}

#[tokio::test]
async fn delivery_then_acceptance_completes() {
    let pool = memory_pool().await;
    let o = seed_order(&pool).await;
    order::transition(&pool, o.id, PROVIDER, OrderStatus::InProgress)
        .await
        .unwrap();

    let delivered = order::submit_delivery(&pool, o.id, PROVIDER, "Final files attached")
        .await
        .unwrap();
    assert!(delivered.delivered_at.is_some());
    // Delivery alone does not complete
    assert_eq!(delivered.status, OrderStatus::InProgress);
    assert!(delivered.completed_at.is_none());

    let completed = order::accept_delivery(&pool, o.id, BUYER).await.unwrap();
    assert_eq!(completed.status, OrderStatus::Completed);
    assert!(completed.buyer_accepted);
    assert!(completed.completed_at.is_some());

    // Outbox rows landed with their transactions
    let buyer_feed = notification::find_by_user(&pool, BUYER, 10, 0).await.unwrap();
    assert_eq!(buyer_feed.len(), 1);
    assert_eq!(buyer_feed[0].kind, NotificationKind::OrderDelivered);
    assert_eq!(buyer_feed[0].related_id, o.id);

    let provider_feed = notification::find_by_user(&pool, PROVIDER, 10, 0).await.unwrap();
    assert_eq!(provider_feed.len(), 1);
    assert_eq!(provider_feed[0].kind, NotificationKind::OrderCompleted);
}

#[tokio::test]
async fn completed_at_tracks_status() {
    let pool = memory_pool().await;
    let o = seed_order(&pool).await;

    // Non-completed states never carry completed_at
    for target in [OrderStatus::InProgress, OrderStatus::Revision] {
        let moved = order::transition(&pool, o.id, PROVIDER, target).await.unwrap();
        assert!(moved.completed_at.is_none());
    }

    order::submit_delivery(&pool, o.id, PROVIDER, "done").await.unwrap();
    let completed = order::accept_delivery(&pool, o.id, BUYER).await.unwrap();
    assert_eq!(completed.status, OrderStatus::Completed);
    assert!(completed.completed_at.is_some());
}

#[tokio::test]
async fn nothing_leaves_a_terminal_state() {
    let pool = memory_pool().await;
    let o = seed_order(&pool).await;

    let cancelled = order::transition(&pool, o.id, BUYER, OrderStatus::Cancelled)
        .await
        .unwrap();
    assert_eq!(cancelled.status, OrderStatus::Cancelled);

    for target in [
        OrderStatus::InProgress,
        OrderStatus::Revision,
        OrderStatus::Cancelled,
    ] {
        let err = order::transition(&pool, o.id, BUYER, target).await.unwrap_err();
        assert!(matches!(err, RepoError::InvalidState(_)));
    }

    // The counterparty was told
    let provider_feed = notification::find_by_user(&pool, PROVIDER, 10, 0).await.unwrap();
    assert_eq!(provider_feed.len(), 1);
    assert_eq!(provider_feed[0].kind, NotificationKind::OrderCancelled);
}

#[tokio::test]
async fn delivering_a_completed_order_fails() {
    let pool = memory_pool().await;
    let o = seed_order(&pool).await;
    order::submit_delivery(&pool, o.id, PROVIDER, "v1").await.unwrap();
    let completed = order::accept_delivery(&pool, o.id, BUYER).await.unwrap();

    let err = order::submit_delivery(&pool, o.id, PROVIDER, "v2")
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::InvalidState(_)));

    // delivered_at unchanged
    let after = order::find_by_id(&pool, o.id).await.unwrap().unwrap();
    assert_eq!(after.delivered_at, completed.delivered_at);
}

#[tokio::test]
async fn acceptance_requires_a_delivery() {
    let pool = memory_pool().await;
    let o = seed_order(&pool).await;

    let err = order::accept_delivery(&pool, o.id, BUYER).await.unwrap_err();
    assert!(matches!(err, RepoError::InvalidState(_)));
}

#[tokio::test]
async fn ownership_is_enforced() {
    let pool = memory_pool().await;
    let o = seed_order(&pool).await;

    let err = order::submit_delivery(&pool, o.id, BUYER, "not mine")
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Forbidden(_)));

    order::submit_delivery(&pool, o.id, PROVIDER, "handing over")
        .await
        .unwrap();

    let err = order::accept_delivery(&pool, o.id, PROVIDER).await.unwrap_err();
    assert!(matches!(err, RepoError::Forbidden(_)));

    let err = order::transition(&pool, o.id, STRANGER, OrderStatus::Cancelled)
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Forbidden(_)));
}

#[tokio::test]
async fn delivery_note_is_required() {
    let pool = memory_pool().await;
    let o = seed_order(&pool).await;

    let err = order::submit_delivery(&pool, o.id, PROVIDER, "   ")
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));

    let after = order::find_by_id(&pool, o.id).await.unwrap().unwrap();
    assert!(after.delivered_at.is_none());
}
