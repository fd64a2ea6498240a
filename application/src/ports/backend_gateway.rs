//! Backend gateway port
//!
//! Defines the interface for reaching text-generation backends. The backend
//! itself (model loading, tokenization, hardware placement) is external; the
//! pipeline only needs "generate text from a prompt given sampling parameters".

use async_trait::async_trait;
use ensemble_domain::GenerationRequest;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors from a single backend call.
///
/// Every variant means "this backend is unavailable for this round": the
/// stages log it and continue with the remaining backends.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BackendError {
    #[error("Backend not available: {0}")]
    Unavailable(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    #[error("Malformed output: {0}")]
    MalformedOutput(String),
}

/// Gateway for text-generation backends
///
/// This port defines how the application layer obtains backend handles.
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait BackendGateway: Send + Sync {
    /// Obtain the generator registered under `backend_id`.
    async fn connect(&self, backend_id: &str) -> Result<Arc<dyn TextGenerator>, BackendError>;
}

/// A connected text-generation backend
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Identifier of this backend
    fn backend_id(&self) -> &str;

    /// Generate `request.num_samples` completions.
    ///
    /// Each returned text may or may not begin with the verbatim prompt.
    async fn generate(&self, request: &GenerationRequest) -> Result<Vec<String>, BackendError>;
}
