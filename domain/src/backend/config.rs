//! Backend configuration value objects

use serde::{Deserialize, Serialize};

/// System-wide default output budget when neither backend nor task sets one
pub const DEFAULT_MAX_TOKENS: u32 = 512;

/// System-wide default sampling temperature
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

/// Default output budget of the synthesis backend
pub const DEFAULT_SYNTHESIS_MAX_TOKENS: u32 = 1024;

/// Default sampling temperature of the synthesis backend
pub const DEFAULT_SYNTHESIS_TEMPERATURE: f64 = 0.3;

/// Task tag carried by the synthesis backend descriptor
pub const SYNTHESIS_TASK: &str = "synthesis";

/// A resolved backend descriptor (Value Object)
///
/// Created by the configuration resolver from the task defaults overridden
/// per entry. Immutable once resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Backend identifier, unique within a task's list
    pub id: String,
    /// Task this descriptor was resolved for
    pub task: String,
    /// Maximum number of tokens the backend may generate
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f64,
}

impl BackendConfig {
    pub fn new(id: impl Into<String>, task: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            task: task.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    /// Build a generation request for this backend with its own budget and temperature.
    pub fn request(&self, prompt: impl Into<String>) -> GenerationRequest {
        GenerationRequest::new(prompt, self.max_tokens, self.temperature)
    }
}

/// A single call to a text-generation backend (Value Object)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Prompt text sent verbatim
    pub prompt: String,
    /// Output budget
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f64,
    /// Number of independent samples requested (at least 1)
    pub num_samples: u32,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>, max_tokens: u32, temperature: f64) -> Self {
        Self {
            prompt: prompt.into(),
            max_tokens,
            temperature,
            num_samples: 1,
        }
    }

    /// Request `n` samples; values below 1 are raised to 1.
    pub fn with_samples(mut self, n: u32) -> Self {
        self.num_samples = n.max(1);
        self
    }

    /// Whether the backend should sample rather than decode greedily
    pub fn is_sampling(&self) -> bool {
        self.temperature > 0.0
    }
}
