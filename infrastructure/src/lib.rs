//! Infrastructure layer for llm-ensemble
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod backends;
pub mod config;

// Re-export commonly used types
pub use backends::{BackendFactory, BackendRegistry, HttpBackendFactory, HttpTextGenerator};
pub use config::{
    ConfigIssue, ConfigLoader, FileConfig, FileConfigResolver, FileInferenceConfig, Severity,
};
