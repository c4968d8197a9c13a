//! Error types for spam-rs

use thiserror::Error;

/// Result type alias for classifier operations
pub type Result<T> = std::result::Result<T, SpamError>;

/// Classifier error types
#[derive(Error, Debug)]
pub enum SpamError {
    /// Training label is neither `ham` nor `spam`
    #[error("Invalid label: {0:?} (expected \"ham\" or \"spam\")")]
    InvalidLabel(String),

    /// A required field was not supplied
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A word count or document total is already at its maximum
    #[error("Count overflow: {0}")]
    CountOverflow(String),

    /// The same word appears twice in a snapshot
    #[error("Duplicate word in snapshot: {0:?}")]
    DuplicateWord(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
