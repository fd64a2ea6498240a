//! Configuration resolver port
//!
//! Decides which backends serve which task and which backend synthesizes.

use ensemble_domain::{BackendConfig, DomainError};
use std::collections::BTreeSet;

/// Maps task identifiers to backend descriptors
///
/// Implementations read a configuration source that is loaded once and then
/// only read, so they are shared freely across concurrent requests.
pub trait ConfigResolver: Send + Sync {
    /// Ordered backend descriptors for `task`.
    ///
    /// Fails with [`DomainError::UnknownTask`] when the task has no entry.
    fn resolve(&self, task: &str) -> Result<Vec<BackendConfig>, DomainError>;

    /// The single synthesis backend.
    ///
    /// Fails with [`DomainError::MissingSection`] when none is configured.
    fn resolve_synthesis(&self) -> Result<BackendConfig, DomainError>;

    /// Every configured task identifier.
    fn list_tasks(&self) -> BTreeSet<String>;
}
