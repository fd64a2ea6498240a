//! Domain error types

use thiserror::Error;

/// Domain-level errors
///
/// These are the configuration failures that are fatal to a request. Per-backend
/// failures never surface here; they are absorbed by the pipeline stages.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Unknown task: {0}")]
    UnknownTask(String),

    #[error("Missing configuration section: {0}")]
    MissingSection(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Operation cancelled")]
    Cancelled,
}

impl DomainError {
    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, DomainError::Cancelled)
    }
}
