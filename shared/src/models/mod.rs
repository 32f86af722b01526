//! Data models
//!
//! Shared between market-server and API clients.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64`; all timestamps are epoch milliseconds; all money
//! amounts are integer minor units (cents) plus a currency code.

pub mod bid;
pub mod milestone;
pub mod notification;
pub mod order;
pub mod review;
pub mod subscription;
pub mod token;

// Re-exports
pub use bid::*;
pub use milestone::*;
pub use notification::*;
pub use order::*;
pub use review::*;
pub use subscription::*;
pub use token::*;
