//! Task and synthesis backend configuration from TOML
//! (`[tasks.<id>]` and `[synthesis]` sections)

use ensemble_domain::backend::config::{
    DEFAULT_MAX_TOKENS, DEFAULT_SYNTHESIS_MAX_TOKENS, DEFAULT_SYNTHESIS_TEMPERATURE,
    DEFAULT_TEMPERATURE, SYNTHESIS_TASK,
};
use ensemble_domain::BackendConfig;
use serde::{Deserialize, Serialize};

/// One entry of a task's `backends` list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileBackendEntry {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

/// Raw `[tasks.<id>]` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileTaskConfig {
    /// Applied to entries without their own `max_tokens`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_max_tokens: Option<u32>,
    /// Applied to entries without their own `temperature`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_temperature: Option<f64>,
    /// Backends in preference order
    pub backends: Vec<FileBackendEntry>,
}

impl FileTaskConfig {
    /// Build descriptors: entry value, then task default, then system default.
    pub fn to_backend_configs(&self, task: &str) -> Vec<BackendConfig> {
        let task_max_tokens = self.default_max_tokens.unwrap_or(DEFAULT_MAX_TOKENS);
        let task_temperature = self.default_temperature.unwrap_or(DEFAULT_TEMPERATURE);

        self.backends
            .iter()
            .map(|entry| {
                BackendConfig::new(entry.id.as_str(), task)
                    .with_max_tokens(entry.max_tokens.unwrap_or(task_max_tokens))
                    .with_temperature(entry.temperature.unwrap_or(task_temperature))
            })
            .collect()
    }
}

/// Raw `[synthesis]` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileSynthesisConfig {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

impl FileSynthesisConfig {
    pub fn to_backend_config(&self) -> BackendConfig {
        BackendConfig::new(self.id.as_str(), SYNTHESIS_TASK)
            .with_max_tokens(self.max_tokens.unwrap_or(DEFAULT_SYNTHESIS_MAX_TOKENS))
            .with_temperature(self.temperature.unwrap_or(DEFAULT_SYNTHESIS_TEMPERATURE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_overrides_task_default() {
        let toml_str = r#"
default_max_tokens = 256
default_temperature = 0.5
backends = [
    { id = "phi-2" },
    { id = "qwen-1.8b", max_tokens = 128, temperature = 0.9 },
]
"#;
        let task: FileTaskConfig = toml::from_str(toml_str).unwrap();
        let backends = task.to_backend_configs("math");

        assert_eq!(backends.len(), 2);
        assert_eq!(backends[0].id, "phi-2");
        assert_eq!(backends[0].task, "math");
        assert_eq!(backends[0].max_tokens, 256);
        assert_eq!(backends[0].temperature, 0.5);
        assert_eq!(backends[1].max_tokens, 128);
        assert_eq!(backends[1].temperature, 0.9);
    }

    #[test]
    fn test_missing_task_defaults_use_system_defaults() {
        let toml_str = r#"backends = [{ id = "phi-2" }]"#;
        let task: FileTaskConfig = toml::from_str(toml_str).unwrap();
        let backends = task.to_backend_configs("qa");

        assert_eq!(backends[0].max_tokens, 512);
        assert_eq!(backends[0].temperature, 0.7);
    }

    #[test]
    fn test_synthesis_defaults() {
        let synthesis: FileSynthesisConfig = toml::from_str(r#"id = "mistral-7b""#).unwrap();
        let config = synthesis.to_backend_config();

        assert_eq!(config.id, "mistral-7b");
        assert_eq!(config.task, "synthesis");
        assert_eq!(config.max_tokens, 1024);
        assert_eq!(config.temperature, 0.3);
    }
}
