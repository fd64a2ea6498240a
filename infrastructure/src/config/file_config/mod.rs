//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into domain and application
//! types on demand.

mod ensemble;
mod inference;
mod issues;
mod tasks;

pub use ensemble::{FileAggregationConfig, FileEnsembleConfig, FileReviewConfig};
pub use inference::{DEFAULT_ENDPOINT, FileInferenceConfig};
pub use issues::{ConfigIssue, ConfigIssueCode, Severity};
pub use tasks::{FileBackendEntry, FileSynthesisConfig, FileTaskConfig};

use ensemble_application::EnsembleParams;
use ensemble_domain::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Backend that merges the reviewed drafts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub synthesis: Option<FileSynthesisConfig>,
    /// Task id to backend list
    pub tasks: BTreeMap<String, FileTaskConfig>,
    /// Fan-out settings
    pub ensemble: FileEnsembleConfig,
    /// Judge call settings
    pub review: FileReviewConfig,
    /// Synthesis prompt settings
    pub aggregation: FileAggregationConfig,
    /// Inference server settings
    pub inference: FileInferenceConfig,
}

impl FileConfig {
    /// Runtime parameters for the pipeline
    pub fn to_params(&self) -> EnsembleParams {
        ensemble::to_params(&self.ensemble, &self.review, &self.aggregation)
    }

    /// Validate the entire configuration, returning all detected issues.
    ///
    /// Checks every backend entry of every task plus the synthesis section:
    /// 1. Empty and duplicate backend ids
    /// 2. Zero token budgets
    /// 3. Temperatures outside `0.0..=2.0`
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        match &self.synthesis {
            Some(synthesis) => {
                if synthesis.id.trim().is_empty() {
                    issues.push(ConfigIssue::error(
                        ConfigIssueCode::EmptyBackendId {
                            section: "synthesis".to_string(),
                        },
                        "synthesis.id cannot be empty",
                    ));
                }
                check_budget(&mut issues, "synthesis", synthesis.max_tokens, synthesis.temperature);
            }
            None => issues.push(ConfigIssue::warning(
                ConfigIssueCode::MissingSynthesis,
                "[synthesis] section is missing; requests with drafts will fail",
            )),
        }

        for (task, config) in &self.tasks {
            let section = format!("tasks.{}", task);

            if config.backends.is_empty() {
                issues.push(ConfigIssue::warning(
                    ConfigIssueCode::EmptyTask { task: task.clone() },
                    format!("[{}] lists no backends", section),
                ));
            }
            check_budget(
                &mut issues,
                &section,
                config.default_max_tokens,
                config.default_temperature,
            );

            let mut seen = HashSet::new();
            for (idx, entry) in config.backends.iter().enumerate() {
                if entry.id.trim().is_empty() {
                    issues.push(ConfigIssue::error(
                        ConfigIssueCode::EmptyBackendId {
                            section: section.clone(),
                        },
                        format!("{}.backends[{}]: id cannot be empty", section, idx),
                    ));
                } else if !seen.insert(entry.id.as_str()) {
                    issues.push(ConfigIssue::error(
                        ConfigIssueCode::DuplicateBackendId {
                            task: task.clone(),
                            id: entry.id.clone(),
                        },
                        format!("{}: backend '{}' is listed twice", section, entry.id),
                    ));
                }
                check_budget(
                    &mut issues,
                    &format!("{}.backends[{}]", section, idx),
                    entry.max_tokens,
                    entry.temperature,
                );
            }
        }

        issues
    }

    /// Validate and fail on any error-severity issue.
    ///
    /// Returns the remaining warnings so the caller can log them.
    pub fn ensure_valid(&self) -> Result<Vec<ConfigIssue>, DomainError> {
        let (errors, warnings): (Vec<_>, Vec<_>) =
            self.validate().into_iter().partition(ConfigIssue::is_error);
        if errors.is_empty() {
            return Ok(warnings);
        }

        let messages: Vec<&str> = errors.iter().map(|i| i.message.as_str()).collect();
        Err(DomainError::InvalidConfig(messages.join("; ")))
    }
}

fn check_budget(
    issues: &mut Vec<ConfigIssue>,
    section: &str,
    max_tokens: Option<u32>,
    temperature: Option<f64>,
) {
    if max_tokens == Some(0) {
        issues.push(ConfigIssue::error(
            ConfigIssueCode::ZeroMaxTokens {
                field: section.to_string(),
            },
            format!("{}: max_tokens must be positive", section),
        ));
    }
    if let Some(t) = temperature
        && !(0.0..=2.0).contains(&t)
    {
        issues.push(ConfigIssue::error(
            ConfigIssueCode::TemperatureOutOfRange {
                field: section.to_string(),
            },
            format!("{}: temperature {} is outside 0.0..=2.0", section, t),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[synthesis]
id = "mistral-7b"
max_tokens = 800

[tasks.math]
default_max_tokens = 256
backends = [{ id = "phi-2" }, { id = "qwen-1.8b", temperature = 0.2 }]

[tasks.code]
backends = [{ id = "starcoder-1b" }]

[ensemble]
top_k = 3
backend_timeout_secs = 45

[review]
excerpt_chars = 300

[inference]
endpoint = "http://localhost:9000"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let synthesis = config.synthesis.as_ref().unwrap();
        assert_eq!(synthesis.id, "mistral-7b");
        assert_eq!(synthesis.max_tokens, Some(800));
        assert_eq!(config.tasks.len(), 2);
        assert_eq!(config.tasks["math"].backends[1].temperature, Some(0.2));
        assert_eq!(config.ensemble.top_k, 3);
        assert_eq!(config.review.excerpt_chars, 300);
        assert_eq!(config.inference.endpoint, "http://localhost:9000");
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_default_config() {
        let config = FileConfig::default();
        assert!(config.synthesis.is_none());
        assert!(config.tasks.is_empty());
        assert_eq!(config.to_params(), EnsembleParams::default());
        assert_eq!(config.inference.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_missing_synthesis_is_a_warning() {
        let issues = FileConfig::default().validate();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, ConfigIssueCode::MissingSynthesis);
        assert!(!issues[0].is_error());
    }

    #[test]
    fn test_validate_reports_every_bad_entry() {
        let toml_str = r#"
[synthesis]
id = ""

[tasks.qa]
default_temperature = 3.5
backends = [
    { id = "phi-2", max_tokens = 0 },
    { id = "phi-2" },
    { id = "" },
    { id = "tiny", temperature = -0.1 },
]

[tasks.chat]
backends = []
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let codes: Vec<ConfigIssueCode> = config.validate().into_iter().map(|i| i.code).collect();

        assert!(codes.contains(&ConfigIssueCode::EmptyBackendId {
            section: "synthesis".to_string()
        }));
        assert!(codes.contains(&ConfigIssueCode::TemperatureOutOfRange {
            field: "tasks.qa".to_string()
        }));
        assert!(codes.contains(&ConfigIssueCode::ZeroMaxTokens {
            field: "tasks.qa.backends[0]".to_string()
        }));
        assert!(codes.contains(&ConfigIssueCode::DuplicateBackendId {
            task: "qa".to_string(),
            id: "phi-2".to_string()
        }));
        assert!(codes.contains(&ConfigIssueCode::EmptyBackendId {
            section: "tasks.qa".to_string()
        }));
        assert!(codes.contains(&ConfigIssueCode::TemperatureOutOfRange {
            field: "tasks.qa.backends[3]".to_string()
        }));
        assert!(codes.contains(&ConfigIssueCode::EmptyTask {
            task: "chat".to_string()
        }));
        assert_eq!(codes.len(), 7);
    }

    #[test]
    fn test_ensure_valid_rejects_errors() {
        let config: FileConfig = toml::from_str(
            r#"
[synthesis]
id = "mistral-7b"

[tasks.qa]
backends = [{ id = "phi-2", max_tokens = 0 }, { id = "phi-2" }]
"#,
        )
        .unwrap();

        let err = config.ensure_valid().unwrap_err();
        let DomainError::InvalidConfig(message) = err else {
            panic!("expected InvalidConfig, got {:?}", err);
        };
        assert!(message.contains("max_tokens must be positive"));
        assert!(message.contains("listed twice"));
    }

    #[test]
    fn test_ensure_valid_passes_warnings_through() {
        let warnings = FileConfig::default().ensure_valid().unwrap();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].code, ConfigIssueCode::MissingSynthesis);
    }

    #[test]
    fn test_example_config_is_valid() {
        let config: FileConfig =
            toml::from_str(include_str!("../../../../ensemble.example.toml")).unwrap();
        assert!(config.validate().is_empty());
        assert_eq!(config.tasks.len(), 3);
        assert_eq!(
            config.inference.endpoint_for("mistral-7b-instruct"),
            "http://127.0.0.1:8081"
        );
    }
}
