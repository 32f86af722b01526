//! Order Model
//!
//! A contract between a buyer and a provider for a priced deliverable.
//! Delivery and completion are two sequential steps: the provider stamps
//! `delivered_at`, the buyer accepts, and completion is derived from the
//! acceptance.

use serde::{Deserialize, Serialize};

/// Order status enum
///
/// Forward movement goes `pending → in_progress → revision → completed`,
/// with `in_progress ↔ revision` allowed for rework rounds. `cancelled` is
/// reachable from any non-terminal state. `completed` and `cancelled` are
/// terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum OrderStatus {
    Pending,
    InProgress,
    Revision,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    /// Statuses a manual transition may move away from, given a target.
    ///
    /// Completion is not listed: it is only reachable through buyer
    /// acceptance of a delivery.
    pub fn allowed_predecessors(target: OrderStatus) -> &'static [OrderStatus] {
        match target {
            OrderStatus::Pending => &[],
            OrderStatus::InProgress => &[OrderStatus::Pending, OrderStatus::Revision],
            OrderStatus::Revision => &[OrderStatus::InProgress],
            OrderStatus::Completed => &[],
            OrderStatus::Cancelled => &[
                OrderStatus::Pending,
                OrderStatus::InProgress,
                OrderStatus::Revision,
            ],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::InProgress => "in_progress",
            OrderStatus::Revision => "revision",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub price_cents: i64,
    pub currency: String,
    pub status: OrderStatus,
    pub buyer_id: i64,
    pub provider_id: i64,
    /// Agreed due date (epoch ms), if any
    pub delivery_date: Option<i64>,
    /// Stamped by the provider when work is handed over
    pub delivered_at: Option<i64>,
    /// Set iff status == completed
    pub completed_at: Option<i64>,
    pub buyer_accepted: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create order payload (platform-side, on offer acceptance)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreate {
    pub title: String,
    pub description: String,
    pub price_cents: i64,
    pub currency: Option<String>,
    pub buyer_id: i64,
    pub provider_id: i64,
    pub delivery_date: Option<i64>,
}

/// Delivery submission payload (provider action)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliverySubmit {
    pub note: String,
}

/// Manual status transition payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderTransition {
    pub status: OrderStatus,
}
