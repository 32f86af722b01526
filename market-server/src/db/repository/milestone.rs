//! Milestone Repository
//!
//! Batch upsert of milestones under an engagement (the owning order).
//! The whole batch commits or none of it does: new items insert, existing
//! items update scoped by `(id, seller_id, engagement_id)` so a guessed id
//! belonging to another seller fails the batch instead of leaking a write.

use super::{RepoError, RepoResult, notification};
use rust_decimal::Decimal;
use shared::models::{
    Milestone, MilestoneBatchResult, MilestoneInput, NotificationCreate, NotificationKind,
};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

const SELECT_COLS: &str = "id, engagement_id, seller_id, buyer_id, title, description, \
     amount_cents, currency, due_date, status, payment_status, created_at, updated_at";

pub async fn find_by_engagement(
    pool: &SqlitePool,
    engagement_id: i64,
) -> RepoResult<Vec<Milestone>> {
    let rows = sqlx::query_as::<_, Milestone>(&format!(
        "SELECT {SELECT_COLS} FROM milestone WHERE engagement_id = ? ORDER BY due_date, id"
    ))
    .bind(engagement_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Milestone>> {
    let row =
        sqlx::query_as::<_, Milestone>(&format!("SELECT {SELECT_COLS} FROM milestone WHERE id = ?"))
            .bind(id)
            .fetch_optional(pool)
            .await?;
    Ok(row)
}

/// All-or-nothing batch upsert. Items without an id insert; items with an
/// id update title/description/amount/due_date of a milestone the calling
/// seller owns. Exactly one buyer notification summarizing the batch goes
/// into the outbox in the same transaction.
pub async fn upsert_batch(
    pool: &SqlitePool,
    engagement_id: i64,
    actor_id: i64,
    items: &[MilestoneInput],
) -> RepoResult<MilestoneBatchResult> {
    let now = now_millis();

    // All-or-nothing validation: one bad item rejects the batch before any
    // write.
    if items.is_empty() {
        return Err(RepoError::Validation("milestone batch is empty".into()));
    }
    for item in items {
        if item.title.trim().is_empty() || item.description.trim().is_empty() {
            return Err(RepoError::Validation(
                "milestone title and description are required".into(),
            ));
        }
        if item.amount_cents <= 0 {
            return Err(RepoError::Validation(format!(
                "milestone amount must be positive, got {}",
                item.amount_cents
            )));
        }
        if item.due_date <= now {
            return Err(RepoError::Validation(
                "milestone due date must be in the future".into(),
            ));
        }
    }

    let mut tx = pool.begin().await?;

    let engagement = sqlx::query_as::<_, (i64, i64, String)>(
        "SELECT provider_id, buyer_id, currency FROM orders WHERE id = ?",
    )
    .bind(engagement_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| RepoError::NotFound(format!("Engagement {engagement_id} not found")))?;
    let (provider_id, buyer_id, currency) = engagement;

    if provider_id != actor_id {
        return Err(RepoError::Forbidden(format!(
            "User {actor_id} is not the provider of engagement {engagement_id}"
        )));
    }

    let mut added = 0usize;
    let mut updated = 0usize;
    let mut new_amount_cents = 0i64;

    for item in items {
        match item.id {
            None => {
                sqlx::query(
                    "INSERT INTO milestone (id, engagement_id, seller_id, buyer_id, title, description, amount_cents, currency, due_date, status, payment_status, created_at, updated_at) \
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, 'pending', 'unpaid', ?10, ?10)",
                )
                .bind(snowflake_id())
                .bind(engagement_id)
                .bind(actor_id)
                .bind(buyer_id)
                .bind(&item.title)
                .bind(&item.description)
                .bind(item.amount_cents)
                .bind(&currency)
                .bind(item.due_date)
                .bind(now)
                .execute(&mut *tx)
                .await?;
                added += 1;
                new_amount_cents += item.amount_cents;
            }
            Some(id) => {
                // Ownership is part of the predicate: someone else's id
                // affects zero rows and sinks the whole batch.
                let rows = sqlx::query(
                    "UPDATE milestone SET title = ?1, description = ?2, amount_cents = ?3, due_date = ?4, updated_at = ?5 \
                     WHERE id = ?6 AND seller_id = ?7 AND engagement_id = ?8",
                )
                .bind(&item.title)
                .bind(&item.description)
                .bind(item.amount_cents)
                .bind(item.due_date)
                .bind(now)
                .bind(id)
                .bind(actor_id)
                .bind(engagement_id)
                .execute(&mut *tx)
                .await?;
                if rows.rows_affected() == 0 {
                    return Err(RepoError::NotFound(format!(
                        "Milestone {id} not found in engagement {engagement_id} for this seller"
                    )));
                }
                updated += 1;
            }
        }
    }

    let total = Decimal::from(new_amount_cents) / Decimal::from(100);
    notification::insert_tx(
        &mut tx,
        NotificationCreate {
            user_id: buyer_id,
            title: "Milestones updated".to_string(),
            description: format!(
                "{added} milestone(s) added, {updated} updated. New amount: {total:.2} {currency}"
            ),
            kind: NotificationKind::MilestonesUpserted,
            related_id: engagement_id,
        },
    )
    .await?;

    tx.commit().await?;

    let milestones = find_by_engagement(pool, engagement_id).await?;
    Ok(MilestoneBatchResult {
        added,
        updated,
        new_amount_cents,
        milestones,
    })
}
