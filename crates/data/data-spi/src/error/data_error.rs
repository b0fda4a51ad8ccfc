//! Data error types.

use thiserror::Error;

/// Case data errors.
#[derive(Debug, Clone, Error)]
pub enum DataError {
    /// Backing file or store does not exist
    #[error("Dataset not found at: {0}")]
    NotFound(String),

    /// Reading the backing store failed
    #[error("Failed to read dataset: {0}")]
    ReadFailed(String),

    /// A required column is missing from the header
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// Every row was dropped during parsing
    #[error("No valid records in dataset")]
    NoValidRecords,
}

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;
