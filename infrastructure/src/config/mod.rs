//! Configuration file loading for llm-ensemble
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `ENSEMBLE_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./ensemble.toml` or `./.ensemble.toml`
//! 4. Global: `~/.config/llm-ensemble/config.toml`
//! 5. Default values

mod file_config;
mod loader;
mod resolver;

pub use file_config::{
    ConfigIssue, ConfigIssueCode, DEFAULT_ENDPOINT, FileAggregationConfig, FileBackendEntry,
    FileConfig, FileEnsembleConfig, FileInferenceConfig, FileReviewConfig, FileSynthesisConfig,
    FileTaskConfig, Severity,
};
pub use loader::ConfigLoader;
pub use resolver::FileConfigResolver;
