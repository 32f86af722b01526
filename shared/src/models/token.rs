//! Token Model
//!
//! Tokens are the consumable units that gate bid placement: one token per
//! bid. Balances only move through completed purchases (credit) and
//! successful bid creation (debit) and can never go negative.

use serde::{Deserialize, Serialize};

/// Per-seller token balance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct TokenBalance {
    pub seller_id: i64,
    pub balance: i64,
    pub updated_at: i64,
}

/// Purchasable token plan (seeded by migration)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct TokenPlan {
    pub id: i64,
    pub name: String,
    pub tokens: i64,
    pub price_cents: i64,
    pub currency: String,
    pub is_active: bool,
}

/// Purchase status enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum PurchaseStatus {
    Completed,
}

/// Token purchase audit record (one per balance credit)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct TokenPurchase {
    pub id: i64,
    /// Client-generated idempotency key; replays return the original row
    pub attempt_id: String,
    pub seller_id: i64,
    pub plan_id: i64,
    pub tokens: i64,
    pub amount_cents: i64,
    pub currency: String,
    pub status: PurchaseStatus,
    pub created_at: i64,
}

/// Purchase request payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPurchaseRequest {
    pub plan_id: i64,
    /// Idempotency key for safe retries
    pub attempt_id: String,
}
