//! Order Repository
//!
//! Owns the order state machine. Delivery and completion are two sequential
//! steps: the provider stamps `delivered_at` (with a buyer notification in
//! the same transaction), the buyer accepts, and acceptance is the only path
//! into `completed`. Every guarded write repeats its state predicate in the
//! WHERE clause so a concurrent transition makes the write affect zero rows
//! instead of silently succeeding.

use super::{RepoError, RepoResult, notification};
use shared::models::{NotificationCreate, NotificationKind, Order, OrderCreate, OrderStatus};
use shared::util::{now_millis, snowflake_id};
use sqlx::{Sqlite, SqlitePool, Transaction};

const SELECT_COLS: &str = "id, title, description, price_cents, currency, status, buyer_id, \
     provider_id, delivery_date, delivered_at, completed_at, buyer_accepted, created_at, updated_at";

const NON_TERMINAL: &str = "('pending', 'in_progress', 'revision')";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Order>> {
    let order =
        sqlx::query_as::<_, Order>(&format!("SELECT {SELECT_COLS} FROM orders WHERE id = ?"))
            .bind(id)
            .fetch_optional(pool)
            .await?;
    Ok(order)
}

async fn find_by_id_tx(tx: &mut Transaction<'_, Sqlite>, id: i64) -> RepoResult<Order> {
    sqlx::query_as::<_, Order>(&format!("SELECT {SELECT_COLS} FROM orders WHERE id = ?"))
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Order {id} not found")))
}

/// Orders a user participates in, either side, newest first.
pub async fn find_by_party(
    pool: &SqlitePool,
    user_id: i64,
    limit: i32,
    offset: i32,
) -> RepoResult<Vec<Order>> {
    let orders = sqlx::query_as::<_, Order>(&format!(
        "SELECT {SELECT_COLS} FROM orders WHERE buyer_id = ?1 OR provider_id = ?1 \
         ORDER BY created_at DESC LIMIT ?2 OFFSET ?3"
    ))
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;
    Ok(orders)
}

pub async fn find_by_status(
    pool: &SqlitePool,
    status: OrderStatus,
    limit: i32,
    offset: i32,
) -> RepoResult<Vec<Order>> {
    let orders = sqlx::query_as::<_, Order>(&format!(
        "SELECT {SELECT_COLS} FROM orders WHERE status = ? ORDER BY created_at DESC LIMIT ? OFFSET ?"
    ))
    .bind(status)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;
    Ok(orders)
}

/// Create an order in `pending` (platform-side, on offer acceptance).
pub async fn create(pool: &SqlitePool, data: OrderCreate) -> RepoResult<Order> {
    let id = snowflake_id();
    let now = now_millis();
    let currency = data.currency.unwrap_or_else(|| "EUR".to_string());
    sqlx::query(
        "INSERT INTO orders (id, title, description, price_cents, currency, status, buyer_id, provider_id, delivery_date, buyer_accepted, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, 'pending', ?6, ?7, ?8, 0, ?9, ?9)",
    )
    .bind(id)
    .bind(&data.title)
    .bind(&data.description)
    .bind(data.price_cents)
    .bind(&currency)
    .bind(data.buyer_id)
    .bind(data.provider_id)
    .bind(data.delivery_date)
    .bind(now)
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create order".into()))
}

/// Provider hands over the work: stamp `delivered_at` and notify the buyer,
/// atomically. The order stays in its current (non-terminal) state until the
/// buyer accepts.
pub async fn submit_delivery(
    pool: &SqlitePool,
    order_id: i64,
    actor_id: i64,
    note: &str,
) -> RepoResult<Order> {
    if note.trim().is_empty() {
        return Err(RepoError::Validation("delivery note must not be empty".into()));
    }

    let mut tx = pool.begin().await?;

    let order = find_by_id_tx(&mut tx, order_id).await?;
    if order.provider_id != actor_id {
        return Err(RepoError::Forbidden(format!(
            "User {actor_id} is not the provider of order {order_id}"
        )));
    }
    if order.status.is_terminal() {
        return Err(RepoError::InvalidState(format!(
            "Order {order_id} is {} and cannot accept a delivery",
            order.status.as_str()
        )));
    }

    let now = now_millis();
    let rows = sqlx::query(&format!(
        "UPDATE orders SET delivered_at = ?1, updated_at = ?1 WHERE id = ?2 AND status IN {NON_TERMINAL}"
    ))
    .bind(now)
    .bind(order_id)
    .execute(&mut *tx)
    .await?;
    if rows.rows_affected() == 0 {
        // Raced with a terminal transition
        return Err(RepoError::InvalidState(format!(
            "Order {order_id} can no longer accept a delivery"
        )));
    }

    notification::insert_tx(
        &mut tx,
        NotificationCreate {
            user_id: order.buyer_id,
            title: "Delivery received".to_string(),
            description: note.to_string(),
            kind: NotificationKind::OrderDelivered,
            related_id: order_id,
        },
    )
    .await?;

    tx.commit().await?;

    find_by_id(pool, order_id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Order {order_id} not found")))
}

/// Buyer accepts a delivery: the single path into `completed`. Sets
/// `buyer_accepted`, stamps `completed_at` and notifies the provider,
/// atomically. The guard demands a stamped delivery and a non-terminal
/// state, so two racing acceptances cannot both commit.
pub async fn accept_delivery(pool: &SqlitePool, order_id: i64, actor_id: i64) -> RepoResult<Order> {
    let mut tx = pool.begin().await?;

    let order = find_by_id_tx(&mut tx, order_id).await?;
    if order.buyer_id != actor_id {
        return Err(RepoError::Forbidden(format!(
            "User {actor_id} is not the buyer of order {order_id}"
        )));
    }
    if order.status.is_terminal() {
        return Err(RepoError::InvalidState(format!(
            "Order {order_id} is already {}",
            order.status.as_str()
        )));
    }
    if order.delivered_at.is_none() {
        return Err(RepoError::InvalidState(format!(
            "Order {order_id} has no delivery to accept"
        )));
    }

    let now = now_millis();
    let rows = sqlx::query(&format!(
        "UPDATE orders SET status = 'completed', buyer_accepted = 1, completed_at = ?1, updated_at = ?1 \
         WHERE id = ?2 AND delivered_at IS NOT NULL AND status IN {NON_TERMINAL}"
    ))
    .bind(now)
    .bind(order_id)
    .execute(&mut *tx)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::InvalidState(format!(
            "Order {order_id} can no longer be completed"
        )));
    }

    notification::insert_tx(
        &mut tx,
        NotificationCreate {
            user_id: order.provider_id,
            title: "Order completed".to_string(),
            description: format!("Order \"{}\" was accepted by the buyer", order.title),
            kind: NotificationKind::OrderCompleted,
            related_id: order_id,
        },
    )
    .await?;

    tx.commit().await?;

    find_by_id(pool, order_id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Order {order_id} not found")))
}

/// Manual status transition along the chain, or into `cancelled` from any
/// non-terminal state. `completed` is rejected here: it is only reachable
/// through [`accept_delivery`].
pub async fn transition(
    pool: &SqlitePool,
    order_id: i64,
    actor_id: i64,
    target: OrderStatus,
) -> RepoResult<Order> {
    // The predecessor set doubles as the WHERE predicate of the
    // conditional write.
    let preds = OrderStatus::allowed_predecessors(target);
    if preds.is_empty() {
        return Err(RepoError::InvalidState(format!(
            "Cannot transition an order to {} directly",
            target.as_str()
        )));
    }
    let guard = format!(
        "status IN ({})",
        preds
            .iter()
            .map(|s| format!("'{}'", s.as_str()))
            .collect::<Vec<_>>()
            .join(", ")
    );

    let mut tx = pool.begin().await?;

    let order = find_by_id_tx(&mut tx, order_id).await?;
    if order.buyer_id != actor_id && order.provider_id != actor_id {
        return Err(RepoError::Forbidden(format!(
            "User {actor_id} is not a party of order {order_id}"
        )));
    }

    let now = now_millis();
    let rows = sqlx::query(&format!(
        "UPDATE orders SET status = ?1, updated_at = ?2 WHERE id = ?3 AND {guard}"
    ))
    .bind(target)
    .bind(now)
    .bind(order_id)
    .execute(&mut *tx)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::InvalidState(format!(
            "Order {order_id} cannot move from {} to {}",
            order.status.as_str(),
            target.as_str()
        )));
    }

    if target == OrderStatus::Cancelled {
        // Tell the counterparty
        let other = if actor_id == order.buyer_id {
            order.provider_id
        } else {
            order.buyer_id
        };
        notification::insert_tx(
            &mut tx,
            NotificationCreate {
                user_id: other,
                title: "Order cancelled".to_string(),
                description: format!("Order \"{}\" was cancelled", order.title),
                kind: NotificationKind::OrderCancelled,
                related_id: order_id,
            },
        )
        .await?;
    }

    tx.commit().await?;

    find_by_id(pool, order_id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Order {order_id} not found")))
}
