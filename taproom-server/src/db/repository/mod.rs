//! Repository Module
//!
//! Data access functions over the SQLite pool. Repositories own the
//! SQL, including the multi-statement transactional sequences around
//! the loyalty ledger; handlers never touch raw queries.

// Accounts
pub mod pending_user;
pub mod user;

// Order lifecycle
pub mod order;

// Loyalty ledger
pub mod ledger;
pub mod purchase;

// key/value settings
pub mod settings;

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
