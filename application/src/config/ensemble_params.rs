//! Ensemble parameters: pipeline policy.
//!
//! [`EnsembleParams`] groups the static parameters that control how the
//! pipeline stages fan out and how much each backend call may cost. These are
//! application-layer concerns; which backends serve a task is decided by the
//! [`ConfigResolver`](crate::ports::config_resolver::ConfigResolver).

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Pipeline policy parameters.
///
/// | Field | Stage | Default |
/// |-------|-------|---------|
/// | `top_k` | Draft | 5 |
/// | `samples_per_backend` | Draft | 1 |
/// | `max_concurrency` | Draft, Review | 4 |
/// | `backend_timeout` | all | 120s |
/// | `review_max_tokens` | Review | 40 |
/// | `review_temperature` | Review | 0.1 |
/// | `review_excerpt_chars` | Review | 500 |
/// | `rationale_chars` | Aggregation | 80 |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnsembleParams {
    /// Number of configured backends used for drafting (first K in config order).
    pub top_k: usize,
    /// Samples requested from each backend during drafting.
    pub samples_per_backend: u32,
    /// Upper bound on backend calls in flight at once.
    pub max_concurrency: usize,
    /// Timeout for each backend invocation.
    pub backend_timeout: Duration,
    /// Output budget for a judge's scoring response.
    pub review_max_tokens: u32,
    /// Sampling temperature for judges (near-deterministic).
    pub review_temperature: f64,
    /// Characters of a draft shown to a judge.
    pub review_excerpt_chars: usize,
    /// Characters of each rationale shown to the synthesis backend.
    pub rationale_chars: usize,
}

impl Default for EnsembleParams {
    fn default() -> Self {
        Self {
            top_k: 5,
            samples_per_backend: 1,
            max_concurrency: 4,
            backend_timeout: Duration::from_secs(120),
            review_max_tokens: 40,
            review_temperature: 0.1,
            review_excerpt_chars: 500,
            rationale_chars: 80,
        }
    }
}

impl EnsembleParams {
    // ==================== Builder Methods ====================

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_samples_per_backend(mut self, samples: u32) -> Self {
        self.samples_per_backend = samples.max(1);
        self
    }

    pub fn with_max_concurrency(mut self, max: usize) -> Self {
        self.max_concurrency = max.max(1);
        self
    }

    pub fn with_backend_timeout(mut self, timeout: Duration) -> Self {
        self.backend_timeout = timeout;
        self
    }

    pub fn with_review_budget(mut self, max_tokens: u32, temperature: f64) -> Self {
        self.review_max_tokens = max_tokens;
        self.review_temperature = temperature;
        self
    }

    pub fn with_review_excerpt_chars(mut self, chars: usize) -> Self {
        self.review_excerpt_chars = chars;
        self
    }

    pub fn with_rationale_chars(mut self, chars: usize) -> Self {
        self.rationale_chars = chars;
        self
    }
}
