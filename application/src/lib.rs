//! Application layer for llm-ensemble
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::EnsembleParams;
pub use ports::{
    backend_gateway::{BackendError, BackendGateway, TextGenerator},
    config_resolver::ConfigResolver,
    progress::{NoProgress, ProgressNotifier},
};
pub use use_cases::aggregate::{AggregateUseCase, FALLBACK_FRAGMENT};
pub use use_cases::generate_drafts::DraftGenerationUseCase;
pub use use_cases::peer_review::PeerReviewUseCase;
pub use use_cases::run_ensemble::{RunEnsembleError, RunEnsembleInput, RunEnsembleUseCase};
