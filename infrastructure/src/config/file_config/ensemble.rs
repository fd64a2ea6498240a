//! Pipeline tuning from TOML (`[ensemble]`, `[review]` and `[aggregation]` sections)

use ensemble_application::EnsembleParams;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw `[ensemble]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileEnsembleConfig {
    /// Backends consulted per task
    pub top_k: usize,
    pub samples_per_backend: u32,
    /// Simultaneous backend calls per stage
    pub max_concurrency: usize,
    pub backend_timeout_secs: u64,
}

impl Default for FileEnsembleConfig {
    fn default() -> Self {
        let params = EnsembleParams::default();
        Self {
            top_k: params.top_k,
            samples_per_backend: params.samples_per_backend,
            max_concurrency: params.max_concurrency,
            backend_timeout_secs: params.backend_timeout.as_secs(),
        }
    }
}

/// Raw `[review]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileReviewConfig {
    pub max_tokens: u32,
    pub temperature: f64,
    /// Characters of each draft shown to a judge
    pub excerpt_chars: usize,
}

impl Default for FileReviewConfig {
    fn default() -> Self {
        let params = EnsembleParams::default();
        Self {
            max_tokens: params.review_max_tokens,
            temperature: params.review_temperature,
            excerpt_chars: params.review_excerpt_chars,
        }
    }
}

/// Raw `[aggregation]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAggregationConfig {
    /// Characters of each judge rationale shown to the synthesis backend
    pub rationale_chars: usize,
}

impl Default for FileAggregationConfig {
    fn default() -> Self {
        Self {
            rationale_chars: EnsembleParams::default().rationale_chars,
        }
    }
}

/// Combine the three sections into runtime parameters.
pub fn to_params(
    ensemble: &FileEnsembleConfig,
    review: &FileReviewConfig,
    aggregation: &FileAggregationConfig,
) -> EnsembleParams {
    EnsembleParams::default()
        .with_top_k(ensemble.top_k)
        .with_samples_per_backend(ensemble.samples_per_backend)
        .with_max_concurrency(ensemble.max_concurrency)
        .with_backend_timeout(Duration::from_secs(ensemble.backend_timeout_secs))
        .with_review_budget(review.max_tokens, review.temperature)
        .with_review_excerpt_chars(review.excerpt_chars)
        .with_rationale_chars(aggregation.rationale_chars)
}
