//! Review Model
//!
//! Exactly one record per order, carrying two independently written rating
//! axes: the buyer rates the seller, the provider rates the buyer. Each
//! axis is write-once; whether the buyer has been rated is derived from
//! `buyer_rating IS NOT NULL`, not a separate flag.

use serde::{Deserialize, Serialize};

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

/// Review entity (one row per order)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Review {
    pub id: i64,
    pub order_id: i64,
    /// The order's buyer (writer of the seller axis)
    pub reviewer_id: i64,
    /// The order's provider (writer of the buyer axis)
    pub reviewee_id: i64,
    /// Seller rating, 1-5; null until the buyer writes it
    pub rating: Option<i32>,
    pub comment: Option<String>,
    pub submitted_at: Option<i64>,
    /// Buyer rating, 1-5; null until the provider writes it
    pub buyer_rating: Option<i32>,
    pub buyer_comment: Option<String>,
    pub buyer_rated_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Review {
    /// Read model: has the provider rated the buyer yet?
    pub fn buyer_rated(&self) -> bool {
        self.buyer_rating.is_some()
    }
}

/// Seller-rating submission (buyer action)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewSubmit {
    pub rating: i32,
    pub comment: String,
}

/// Buyer-rating submission (provider action)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuyerRatingSubmit {
    pub rating: i32,
    pub comment: Option<String>,
}
