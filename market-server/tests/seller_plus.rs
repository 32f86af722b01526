//! Seller Plus subscription tests
//!
//! Idempotent purchase, 30-day expiry, and the featured flag flip.

use market_server::db::DbService;
use market_server::db::repository::subscription;
use shared::models::SELLER_PLUS_DURATION_MS;
use shared::util::now_millis;
use sqlx::SqlitePool;

const SELLER: i64 = 42;

async fn memory_pool() -> SqlitePool {
    DbService::open_in_memory().await.unwrap().pool
}

#[tokio::test]
async fn purchase_activates_and_features_services() {
    let pool = memory_pool().await;
    subscription::create_service(&pool, SELLER, "Logo package").await.unwrap();
    subscription::create_service(&pool, SELLER, "Brand guide").await.unwrap();

    let result = subscription::purchase(&pool, SELLER).await.unwrap();
    assert!(result.newly_created);
    let sub = &result.subscription;
    assert_eq!(sub.seller_id, SELLER);
    assert_eq!(sub.expires_at - sub.started_at, SELLER_PLUS_DURATION_MS);
    assert!(sub.is_active(now_millis()));

    let services = subscription::find_services(&pool, SELLER).await.unwrap();
    assert_eq!(services.len(), 2);
    assert!(services.iter().all(|s| s.is_featured));
}

#[tokio::test]
async fn second_purchase_while_active_is_a_noop() {
    let pool = memory_pool().await;

    let first = subscription::purchase(&pool, SELLER).await.unwrap();
    let second = subscription::purchase(&pool, SELLER).await.unwrap();

    assert!(first.newly_created);
    assert!(!second.newly_created);
    assert_eq!(second.subscription.id, first.subscription.id);

    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM seller_plus_subscription WHERE seller_id = ?")
            .bind(SELLER)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn new_service_inherits_the_featured_flag() {
    let pool = memory_pool().await;
    subscription::purchase(&pool, SELLER).await.unwrap();

    let service = subscription::create_service(&pool, SELLER, "Rush delivery")
        .await
        .unwrap();
    assert!(service.is_featured);

    // Sellers without a subscription list unfeatured
    let plain = subscription::create_service(&pool, 77, "Basic package")
        .await
        .unwrap();
    assert!(!plain.is_featured);
}

#[tokio::test]
async fn status_reflects_expiry() {
    let pool = memory_pool().await;
    subscription::purchase(&pool, SELLER).await.unwrap();

    let now = now_millis();
    assert!(subscription::find_active(&pool, SELLER, now).await.unwrap().is_some());
    // Just past expiry the same row no longer counts as active
    let later = now + SELLER_PLUS_DURATION_MS + 1;
    assert!(subscription::find_active(&pool, SELLER, later).await.unwrap().is_none());
}
