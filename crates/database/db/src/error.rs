use crate::CanRetry;
use std::time::Duration;

use sea_orm::SqlErr;

/// The error type for database operations.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    /// A database error occurred.
    #[error("database error: {0}")]
    DatabaseError(#[from] sea_orm::DbErr),
    /// A persisted row could not be decoded.
    #[error("invalid blob record in database: {0}")]
    InvalidRecord(String),
    /// The operation did not complete within the configured timeout.
    #[error("database operation timed out after {0:?}")]
    Timeout(Duration),
}

impl CanRetry for DatabaseError {
    fn can_retry(&self) -> bool {
        match self {
            // a duplicate record will never be inserted, no matter how many times we retry.
            Self::DatabaseError(err) => {
                !matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
            }
            Self::InvalidRecord(_) | Self::Timeout(_) => false,
        }
    }
}
