//! Bid Model
//!
//! A seller's priced proposal against a project. Creation is gated by the
//! token ledger: one token is debited atomically with the insert.

use serde::{Deserialize, Serialize};

/// Bid status enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum BidStatus {
    Submitted,
    Accepted,
    Rejected,
    Withdrawn,
}

/// Bid entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Bid {
    pub id: i64,
    /// Client-generated idempotency key; replays return the original row
    pub client_key: String,
    pub project_id: i64,
    pub seller_id: i64,
    pub bid_amount_cents: i64,
    pub message: String,
    pub status: BidStatus,
    pub created_at: i64,
}

/// Bid placement payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BidCreate {
    pub project_id: i64,
    pub bid_amount_cents: i64,
    pub message: String,
    /// Idempotency key for safe retries
    pub client_key: String,
}
