//! Notification Model
//!
//! Outbox rows: a notification intent is inserted in the same transaction
//! as the state change it describes, then dispatched asynchronously by the
//! outbox worker. Dispatch transport is out of scope; "dispatched" means
//! handed to the sink and stamped.

use serde::{Deserialize, Serialize};

/// Notification kind enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum NotificationKind {
    OrderDelivered,
    OrderCompleted,
    OrderCancelled,
    MilestonesUpserted,
    ReviewReceived,
}

/// Notification entity (outbox row)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Notification {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: String,
    pub kind: NotificationKind,
    /// Id of the order/engagement the notification is about
    pub related_id: i64,
    pub dispatched: bool,
    pub created_at: i64,
    pub dispatched_at: Option<i64>,
}

/// Notification intent, written by repositories inside the owning
/// transaction
#[derive(Debug, Clone)]
pub struct NotificationCreate {
    pub user_id: i64,
    pub title: String,
    pub description: String,
    pub kind: NotificationKind,
    pub related_id: i64,
}
