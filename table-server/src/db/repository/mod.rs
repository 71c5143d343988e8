//! Repository Module
//!
//! Free functions over `sqlx` for each table. Every function issues exactly one
//! statement against the executor it is given, so callers decide whether it runs
//! on the pool or inside an open transaction (`&mut *tx`).

pub mod branch;
pub mod customer;
pub mod dining_table;
pub mod favorite;
pub mod inventory;
pub mod occupancy;
pub mod order;
pub mod product;
pub mod report;

use shared::error::{AppError, ErrorCode};
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
        match &err {
            sqlx::Error::RowNotFound => RepoError::NotFound("Row not found".into()),
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                RepoError::Duplicate(db_err.message().to_string())
            }
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                RepoError::Validation(format!("Referenced row does not exist: {}", db_err.message()))
            }
            sqlx::Error::Database(db_err) if db_err.is_check_violation() => {
                RepoError::Validation(db_err.message().to_string())
            }
            _ => RepoError::Database(err.to_string()),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::not_found(msg),
            RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::AlreadyExists, msg),
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::Database(msg) => {
                tracing::error!(error = %msg, "Database error");
                AppError::database("Database error")
            }
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Map a `rows_affected() == 0` update into `NotFound`
pub(crate) fn ensure_affected(rows: u64, what: impl FnOnce() -> String) -> RepoResult<()> {
    if rows == 0 {
        return Err(RepoError::NotFound(what()));
    }
    Ok(())
}
