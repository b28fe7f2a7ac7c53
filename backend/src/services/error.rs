//! Errors raised by the application services.

use crate::db::RepositoryError;
use crate::models::InvalidRecordError;
use crate::parsing::CsvIngestError;
use crate::services::report::ReportError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    InvalidRecord(#[from] InvalidRecordError),

    #[error("Failed to read CSV upload: {0}")]
    Csv(#[from] CsvIngestError),

    #[error(transparent)]
    Report(#[from] ReportError),

    /// The upload was rejected before its content was looked at.
    #[error("Invalid upload: {0}")]
    InvalidUpload(String),

    /// A blocking worker task panicked or was cancelled.
    #[error("Background task failed: {0}")]
    Task(String),
}

impl From<tokio::task::JoinError> for ServiceError {
    fn from(err: tokio::task::JoinError) -> Self {
        ServiceError::Task(err.to_string())
    }
}
