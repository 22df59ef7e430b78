//! Error types for data loading and parsing.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or querying replay data.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("Malformed timestamp: {0:?}")]
    MalformedTimestamp(String),

    #[error("Data source not found: {0}")]
    MissingSource(PathBuf),

    #[error("Malformed row at line {line}: {reason}")]
    MalformedRow { line: usize, reason: String },

    #[error("Missing column: {0:?}")]
    MissingColumn(String),

    #[error("No samples loaded")]
    EmptyDataset,

    #[error("Config parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
