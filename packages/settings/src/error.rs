// ABOUTME: Error types for the settings package
// ABOUTME: Wraps storage failures, input validation, and export lifecycle violations

use rentwise_storage::StorageError;
use thiserror::Error;

use crate::types::ExportStatus;
use crate::validation::SettingsValidationError;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Validation(#[from] SettingsValidationError),

    #[error("Export request not found: {0}")]
    NotFound(String),

    #[error("Cannot move export request from {from} to {to}")]
    InvalidTransition { from: ExportStatus, to: ExportStatus },
}

impl From<sqlx::Error> for SettingsError {
    fn from(err: sqlx::Error) -> Self {
        SettingsError::Storage(StorageError::Sqlx(err))
    }
}

pub type SettingsResult<T> = Result<T, SettingsError>;
