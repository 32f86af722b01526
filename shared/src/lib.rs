//! Shared types for the marketplace transaction core
//!
//! Domain models and helpers used by the server and by API clients.
//! DB row mapping derives are behind the `db` feature so frontend-style
//! consumers can depend on the models without pulling in sqlx.

pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};
