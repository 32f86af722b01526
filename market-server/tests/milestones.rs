//! Milestone batch tests
//!
//! Batches are all-or-nothing: one invalid item, or one item the caller
//! does not own, commits zero rows.

use market_server::db::DbService;
use market_server::db::repository::{RepoError, milestone, notification, order};
use shared::models::{MilestoneInput, NotificationKind, Order, OrderCreate};
use shared::util::now_millis;
use sqlx::SqlitePool;

const BUYER: i64 = 11;
const SELLER: i64 = 22;
const OTHER_SELLER: i64 = 33;

async fn memory_pool() -> SqlitePool {
    DbService::open_in_memory().await.unwrap().pool
}

async fn seed_engagement(pool: &SqlitePool, buyer: i64, seller: i64) -> Order {
    order::create(
        pool,
        OrderCreate {
            title: "Site build".to_string(),
            description: "Marketing site with CMS".to_string(),
            price_cents: 120_000,
            currency: None,
            buyer_id: buyer,
            provider_id: seller,
            delivery_date: None,
        },
    )
    .await
    .unwrap()
}

fn item(title: &str, amount_cents: i64, due_in_ms: i64) -> MilestoneInput {
    MilestoneInput {
        id: None,
        title: title.to_string(),
        description: format!("{title} scope"),
        amount_cents,
        due_date: now_millis() + due_in_ms,
    }
}

const WEEK: i64 = 7 * 24 * 60 * 60 * 1000;

#[tokio::test]
async fn batch_insert_creates_all_items() {
    let pool = memory_pool().await;
    let eng = seed_engagement(&pool, BUYER, SELLER).await;

    let items = vec![item("Design", 40_000, WEEK), item("Build", 80_000, 2 * WEEK)];
    let result = milestone::upsert_batch(&pool, eng.id, SELLER, &items)
        .await
        .unwrap();

    assert_eq!(result.added, 2);
    assert_eq!(result.updated, 0);
    assert_eq!(result.new_amount_cents, 120_000);
    assert_eq!(result.milestones.len(), 2);

    // Exactly one buyer notification summarizing the batch
    let feed = notification::find_by_user(&pool, BUYER, 10, 0).await.unwrap();
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0].kind, NotificationKind::MilestonesUpserted);
    assert_eq!(feed[0].related_id, eng.id);
}

#[tokio::test]
async fn one_invalid_item_commits_nothing() {
    let pool = memory_pool().await;
    let eng = seed_engagement(&pool, BUYER, SELLER).await;

    let items = vec![
        item("Design", 40_000, WEEK),
        // due yesterday
        item("Build", 80_000, -24 * 60 * 60 * 1000),
    ];
    let err = milestone::upsert_batch(&pool, eng.id, SELLER, &items)
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));

    let rows = milestone::find_by_engagement(&pool, eng.id).await.unwrap();
    assert!(rows.is_empty());
    // And no notification either
    let feed = notification::find_by_user(&pool, BUYER, 10, 0).await.unwrap();
    assert!(feed.is_empty());
}

#[tokio::test]
async fn non_positive_amount_rejects_the_batch() {
    let pool = memory_pool().await;
    let eng = seed_engagement(&pool, BUYER, SELLER).await;

    let items = vec![item("Design", 0, WEEK)];
    let err = milestone::upsert_batch(&pool, eng.id, SELLER, &items)
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
}

#[tokio::test]
async fn buyer_cannot_write_milestones() {
    let pool = memory_pool().await;
    let eng = seed_engagement(&pool, BUYER, SELLER).await;

    let err = milestone::upsert_batch(&pool, eng.id, BUYER, &[item("Design", 40_000, WEEK)])
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Forbidden(_)));
}

#[tokio::test]
async fn existing_items_update_in_place() {
    let pool = memory_pool().await;
    let eng = seed_engagement(&pool, BUYER, SELLER).await;

    let created = milestone::upsert_batch(&pool, eng.id, SELLER, &[item("Design", 40_000, WEEK)])
        .await
        .unwrap();
    let existing = &created.milestones[0];

    let edited = MilestoneInput {
        id: Some(existing.id),
        title: "Design (expanded)".to_string(),
        description: "Design scope plus brand guide".to_string(),
        amount_cents: 55_000,
        due_date: now_millis() + 2 * WEEK,
    };
    let result = milestone::upsert_batch(&pool, eng.id, SELLER, &[edited])
        .await
        .unwrap();

    assert_eq!(result.added, 0);
    assert_eq!(result.updated, 1);
    assert_eq!(result.new_amount_cents, 0);

    let rows = milestone::find_by_engagement(&pool, eng.id).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, existing.id);
    assert_eq!(rows[0].title, "Design (expanded)");
    assert_eq!(rows[0].amount_cents, 55_000);
}

#[tokio::test]
async fn foreign_milestone_id_sinks_the_whole_batch() {
    let pool = memory_pool().await;
    let eng_a = seed_engagement(&pool, BUYER, SELLER).await;
    let eng_b = seed_engagement(&pool, BUYER, OTHER_SELLER).await;

    // OTHER_SELLER owns a milestone under their own engagement
    let theirs = milestone::upsert_batch(&pool, eng_b.id, OTHER_SELLER, &[item("Audit", 10_000, WEEK)])
        .await
        .unwrap();
    let foreign_id = theirs.milestones[0].id;

    // SELLER guesses that id inside an otherwise valid batch
    let batch = vec![
        item("Design", 40_000, WEEK),
        MilestoneInput {
            id: Some(foreign_id),
            title: "Hijack".to_string(),
            description: "Should never land".to_string(),
            amount_cents: 1,
            due_date: now_millis() + WEEK,
        },
    ];
    let err = milestone::upsert_batch(&pool, eng_a.id, SELLER, &batch)
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound(_)));

    // The valid item of the failed batch did not survive
    let rows = milestone::find_by_engagement(&pool, eng_a.id).await.unwrap();
    assert!(rows.is_empty());

    // The foreign milestone is untouched
    let untouched = milestone::find_by_id(&pool, foreign_id).await.unwrap().unwrap();
    assert_eq!(untouched.title, "Audit");
    assert_eq!(untouched.seller_id, OTHER_SELLER);
}
