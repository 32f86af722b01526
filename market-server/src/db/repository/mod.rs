//! Repository Module
//!
//! CRUD and transactional operations over the SQLite store. Composite
//! operations (debit + insert, state change + outbox row) run inside a
//! single sqlx transaction; conditional single-row writes carry their
//! guards in the WHERE clause and report via `rows_affected`.

pub mod bid;
pub mod milestone;
pub mod notification;
pub mod order;
pub mod review;
pub mod subscription;
pub mod token;

use crate::utils::AppError;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Write rejected because the record's state forbids it
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Write-once field already written, or duplicate key
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Insufficient tokens")]
    InsufficientTokens,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Forbidden(msg) => AppError::Forbidden(msg),
            RepoError::InvalidState(msg) => AppError::InvalidState(msg),
            RepoError::Conflict(msg) => AppError::Conflict(msg),
            RepoError::InsufficientTokens => AppError::InsufficientTokens,
            RepoError::Validation(msg) => AppError::Validation(msg),
            RepoError::Database(msg) => AppError::Database(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
