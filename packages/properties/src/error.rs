// ABOUTME: Error types for property operations
// ABOUTME: Plan-limit refusals, input validation, and wrapped storage failures

use rentwise_core::LeaseDateError;
use rentwise_storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PropertyError {
    /// Carries the user-facing reason from the limit evaluator
    #[error("{0}")]
    LimitExceeded(String),

    #[error("{0}")]
    StorageLimitExceeded(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error(transparent)]
    InvalidLease(#[from] LeaseDateError),

    #[error("Property not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<sqlx::Error> for PropertyError {
    fn from(err: sqlx::Error) -> Self {
        PropertyError::Storage(StorageError::Sqlx(err))
    }
}

pub type PropertyResult<T> = Result<T, PropertyError>;
