pub mod base;
pub mod category_repository;
pub mod transaction_repository;

use chrono::{DateTime, Utc};

pub use category_repository::{CategoryRepository, SqliteCategoryRepository};
pub use transaction_repository::{SqliteTransactionRepository, TransactionRepository};

/// Repository errors for database operations
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Resource not found")]
    NotFound,

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::RowNotFound => RepositoryError::NotFound,
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                RepositoryError::ConstraintViolation(db_err.message().to_string())
            }
            e => RepositoryError::DatabaseError(e.to_string()),
        }
    }
}

/// Timestamps are stored as unix milliseconds.
pub(crate) fn to_millis(timestamp: DateTime<Utc>) -> i64 {
    timestamp.timestamp_millis()
}

/// Rounds up to the next whole millisecond, for inclusive lower bounds.
pub(crate) fn to_millis_ceil(timestamp: DateTime<Utc>) -> i64 {
    let millis = timestamp.timestamp_millis();
    if timestamp.timestamp_subsec_nanos() % 1_000_000 == 0 {
        millis
    } else {
        millis + 1
    }
}

pub(crate) fn from_millis(millis: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(millis).unwrap_or_default()
}
