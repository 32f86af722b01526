//! Seller Plus Subscription Model
//!
//! A flat-rate, time-boxed subscription independent of the token ledger.
//! While active it marks all of the seller's service listings as featured.

use serde::{Deserialize, Serialize};

/// Subscription duration: 30 days in milliseconds
pub const SELLER_PLUS_DURATION_MS: i64 = 30 * 24 * 60 * 60 * 1000;

/// Seller Plus subscription entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct SellerPlusSubscription {
    pub id: i64,
    pub seller_id: i64,
    pub started_at: i64,
    pub expires_at: i64,
    pub created_at: i64,
}

impl SellerPlusSubscription {
    pub fn is_active(&self, now: i64) -> bool {
        self.expires_at > now
    }
}

/// Purchase outcome: either a fresh subscription or the already-active one
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SellerPlusPurchase {
    pub subscription: SellerPlusSubscription,
    /// False when the purchase was an idempotent no-op on an active sub
    pub newly_created: bool,
}

/// Service listing entity (featured flag flipped by Seller Plus)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Service {
    pub id: i64,
    pub seller_id: i64,
    pub title: String,
    pub is_featured: bool,
    pub created_at: i64,
}
