//! Reputation ledger tests
//!
//! One review row per order; each rating axis is independent and
//! write-once, enforced by the upsert guard rather than a prior read.

use market_server::db::DbService;
use market_server::db::repository::{RepoError, order, review};
use shared::models::{Order, OrderCreate};
use sqlx::SqlitePool;

const BUYER: i64 = 7;
const PROVIDER: i64 = 8;

async fn memory_pool() -> SqlitePool {
    DbService::open_in_memory().await.unwrap().pool
}

async fn completed_order(pool: &SqlitePool) -> Order {
    let o = order::create(
        pool,
        OrderCreate {
            title: "Copywriting".to_string(),
            description: "Landing page copy".to_string(),
            price_cents: 9_000,
            currency: None,
            buyer_id: BUYER,
            provider_id: PROVIDER,
            delivery_date: None,
        },
    )
    .await
    .unwrap();
    order::submit_delivery(pool, o.id, PROVIDER, "draft attached")
        .await
        .unwrap();
    order::accept_delivery(pool, o.id, BUYER).await.unwrap()
}

#[tokio::test]
async fn buyer_rates_seller_first() {
    let pool = memory_pool().await;
    let o = completed_order(&pool).await;

    let r = review::submit_seller_rating(&pool, o.id, BUYER, 5, "Great work")
        .await
        .unwrap();

    assert_eq!(r.order_id, o.id);
    assert_eq!(r.rating, Some(5));
    assert_eq!(r.reviewer_id, BUYER);
    assert_eq!(r.reviewee_id, PROVIDER);
    assert!(r.submitted_at.is_some());
    assert_eq!(r.buyer_rating, None);
    assert!(!r.buyer_rated());
}

#[tokio::test]
async fn provider_rates_buyer_on_the_same_row() {
    let pool = memory_pool().await;
    let o = completed_order(&pool).await;

    let first = review::submit_seller_rating(&pool, o.id, BUYER, 5, "Great work")
        .await
        .unwrap();
    let second = review::submit_buyer_rating(&pool, o.id, PROVIDER, 4, Some("Clear brief"))
        .await
        .unwrap();

    // Same row, both axes populated, seller axis untouched
    assert_eq!(second.id, first.id);
    assert_eq!(second.rating, Some(5));
    assert_eq!(second.buyer_rating, Some(4));
    assert!(second.buyer_rated_at.is_some());

    assert!(review::buyer_rated(&pool, o.id).await.unwrap());
}

#[tokio::test]
async fn axes_are_independent_either_order() {
    let pool = memory_pool().await;
    let o = completed_order(&pool).await;

    // Provider writes first: the insert populates the envelope
    let r = review::submit_buyer_rating(&pool, o.id, PROVIDER, 3, None)
        .await
        .unwrap();
    assert_eq!(r.rating, None);
    assert_eq!(r.buyer_rating, Some(3));
    assert_eq!(r.reviewer_id, BUYER);
    assert_eq!(r.reviewee_id, PROVIDER);

    // Buyer's axis lands on the same row afterwards
    let r2 = review::submit_seller_rating(&pool, o.id, BUYER, 4, "Solid")
        .await
        .unwrap();
    assert_eq!(r2.id, r.id);
    assert_eq!(r2.rating, Some(4));
    assert_eq!(r2.buyer_rating, Some(3));
}

#[tokio::test]
async fn each_axis_is_write_once() {
    let pool = memory_pool().await;
    let o = completed_order(&pool).await;

    review::submit_seller_rating(&pool, o.id, BUYER, 5, "Great")
        .await
        .unwrap();
    let err = review::submit_seller_rating(&pool, o.id, BUYER, 1, "Changed my mind")
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Conflict(_)));

    review::submit_buyer_rating(&pool, o.id, PROVIDER, 4, None)
        .await
        .unwrap();
    let err = review::submit_buyer_rating(&pool, o.id, PROVIDER, 1, None)
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Conflict(_)));

    // First writes survived
    let r = review::find_by_order(&pool, o.id).await.unwrap().unwrap();
    assert_eq!(r.rating, Some(5));
    assert_eq!(r.buyer_rating, Some(4));
}

#[tokio::test]
async fn ratings_open_only_after_completion() {
    let pool = memory_pool().await;
    let o = order::create(
        &pool,
        OrderCreate {
            title: "Copywriting".to_string(),
            description: "Landing page copy".to_string(),
            price_cents: 9_000,
            currency: None,
            buyer_id: BUYER,
            provider_id: PROVIDER,
            delivery_date: None,
        },
    )
    .await
    .unwrap();

    let err = review::submit_seller_rating(&pool, o.id, BUYER, 5, "Too early")
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::InvalidState(_)));

    let err = review::submit_buyer_rating(&pool, o.id, PROVIDER, 5, None)
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::InvalidState(_)));

    assert!(review::find_by_order(&pool, o.id).await.unwrap().is_none());
}

#[tokio::test]
async fn only_the_right_party_writes_each_axis() {
    let pool = memory_pool().await;
    let o = completed_order(&pool).await;

    let err = review::submit_seller_rating(&pool, o.id, PROVIDER, 5, "Self praise")
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Forbidden(_)));

    let err = review::submit_buyer_rating(&pool, o.id, BUYER, 5, None)
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Forbidden(_)));
}

#[tokio::test]
async fn at_most_one_row_per_order() {
    let pool = memory_pool().await;
    let o = completed_order(&pool).await;

    review::submit_seller_rating(&pool, o.id, BUYER, 5, "Great")
        .await
        .unwrap();
    review::submit_buyer_rating(&pool, o.id, PROVIDER, 4, None)
        .await
        .unwrap();

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM review WHERE order_id = ?")
        .bind(o.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn seller_profile_lists_received_ratings() {
    let pool = memory_pool().await;
    let o = completed_order(&pool).await;

    // Buyer-axis-only rows are not profile material yet
    review::submit_buyer_rating(&pool, o.id, PROVIDER, 4, None)
        .await
        .unwrap();
    let listed = review::find_for_seller(&pool, PROVIDER, 10, 0).await.unwrap();
    assert!(listed.is_empty());

    review::submit_seller_rating(&pool, o.id, BUYER, 5, "Great")
        .await
        .unwrap();
    let listed = review::find_for_seller(&pool, PROVIDER, 10, 0).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].rating, Some(5));
}
