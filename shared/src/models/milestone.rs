//! Milestone Model
//!
//! A partial deliverable/payment unit under an engagement (the owning
//! order). Created and amended by the seller in all-or-nothing batches;
//! never written by the buyer.

use serde::{Deserialize, Serialize};

/// Milestone status enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum MilestoneStatus {
    Pending,
    InProgress,
    Delivered,
    Paid,
    Cancelled,
}

/// Payment status enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum PaymentStatus {
    Unpaid,
    Processing,
    Paid,
}

/// Milestone entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Milestone {
    pub id: i64,
    /// Owning order id
    pub engagement_id: i64,
    pub seller_id: i64,
    pub buyer_id: i64,
    pub title: String,
    pub description: String,
    pub amount_cents: i64,
    pub currency: String,
    /// Must be strictly in the future at write time (epoch ms)
    pub due_date: i64,
    pub status: MilestoneStatus,
    pub payment_status: PaymentStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

/// One item of a milestone batch upsert.
///
/// `id = None` inserts a new milestone; `id = Some(..)` edits an existing
/// one owned by the calling seller. Only title/description/amount/due_date
/// are seller-mutable post-creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MilestoneInput {
    pub id: Option<i64>,
    pub title: String,
    pub description: String,
    pub amount_cents: i64,
    pub due_date: i64,
}

/// Batch upsert payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MilestoneBatch {
    pub items: Vec<MilestoneInput>,
}

/// Batch upsert result summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MilestoneBatchResult {
    pub added: usize,
    pub updated: usize,
    /// Sum of the newly inserted amounts, in cents
    pub new_amount_cents: i64,
    pub milestones: Vec<Milestone>,
}
