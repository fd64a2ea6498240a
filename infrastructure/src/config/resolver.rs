//! File-backed [`ConfigResolver`]

use super::file_config::FileConfig;
use ensemble_application::ConfigResolver;
use ensemble_domain::{BackendConfig, DomainError};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Resolves tasks against a loaded (usually process-wide) [`FileConfig`]
pub struct FileConfigResolver {
    config: Arc<FileConfig>,
}

impl FileConfigResolver {
    pub fn new(config: Arc<FileConfig>) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FileConfig {
        &self.config
    }
}

impl ConfigResolver for FileConfigResolver {
    fn resolve(&self, task: &str) -> Result<Vec<BackendConfig>, DomainError> {
        self.config
            .tasks
            .get(task)
            .map(|t| t.to_backend_configs(task))
            .ok_or_else(|| DomainError::UnknownTask(task.to_string()))
    }

    fn resolve_synthesis(&self) -> Result<BackendConfig, DomainError> {
        self.config
            .synthesis
            .as_ref()
            .map(|s| s.to_backend_config())
            .ok_or_else(|| DomainError::MissingSection("synthesis".to_string()))
    }

    fn list_tasks(&self) -> BTreeSet<String> {
        self.config.tasks.keys().cloned().collect()
    }
}
