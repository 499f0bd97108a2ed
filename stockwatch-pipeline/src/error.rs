//! Ingestion, persistence and export error types.
//!
//! Only fatal conditions are errors. Skipped rows and unparseable pivot
//! values are reported as diagnostics and never surface here.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("CSV input is empty or malformed: {0}")]
    EmptyOrMalformedInput(String),

    #[error("Persistence failed: {0}")]
    Persistence(#[from] StoreError),

    #[error("Failed to read config '{path}': {source}")]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

/// Failures reported by a [`RecordStore`](crate::store::RecordStore).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to clear namespace '{namespace}': {reason}")]
    DeleteFailed { namespace: String, reason: String },

    #[error("Failed to write record '{key}': {reason}")]
    WriteFailed { key: String, reason: String },
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for ingestion operations.
pub type IngestResult<T> = Result<T, IngestError>;

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
