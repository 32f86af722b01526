//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! SQLite TEXT has no built-in length enforcement, so limits are applied
//! here before any write.

use crate::utils::AppError;
use shared::models::{MAX_RATING, MIN_RATING};

// ── Text length limits ──────────────────────────────────────────────

/// Titles: orders, milestones, services
pub const MAX_TITLE_LEN: usize = 200;

/// Notes, descriptions, comments, bid messages
pub const MAX_NOTE_LEN: usize = 2000;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

/// Validate a money amount in cents (must be strictly positive).
pub fn validate_amount_cents(amount_cents: i64, field: &str) -> Result<(), AppError> {
    if amount_cents <= 0 {
        return Err(AppError::validation(format!(
            "{field} must be positive, got {amount_cents}"
        )));
    }
    Ok(())
}

/// Validate a rating is within the 1-5 scale.
pub fn validate_rating(rating: i32) -> Result<(), AppError> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(AppError::validation(format!(
            "rating must be between {MIN_RATING} and {MAX_RATING}, got {rating}"
        )));
    }
    Ok(())
}

/// Validate that a due date (epoch ms) is strictly in the future.
pub fn validate_future_date(due_date: i64, now: i64, field: &str) -> Result<(), AppError> {
    if due_date <= now {
        return Err(AppError::validation(format!(
            "{field} must be in the future"
        )));
    }
    Ok(())
}
