//! Domain layer for llm-ensemble
//!
//! This crate contains the core entities, value objects and pure logic of
//! the ensemble pipeline. It has no dependencies on infrastructure or
//! presentation concerns.
//!
//! # Core Concepts
//!
//! ## Ensemble
//!
//! Several small backends draft independent answers to the same request,
//! cross-review each other's drafts, and a single synthesis backend merges
//! everything into one final answer:
//!
//! - **Draft**: one [`Candidate`] per backend sample
//! - **Peer Review**: every judge scores every draft it did not author
//! - **Aggregation**: the synthesis backend produces the [`AggregatedResult`]

pub mod backend;
pub mod core;
pub mod ensemble;
pub mod prompt;

// Re-export commonly used types
pub use backend::config::{BackendConfig, GenerationRequest};
pub use core::{
    error::DomainError,
    string::{excerpt, strip_echo},
    task::{TaskInfo, task_label},
};
pub use ensemble::{
    entities::Stage,
    parsing::{DEFAULT_PEER_SCORE, MISSING_REASON, PeerVerdict, parse_peer_verdict},
    value_objects::{AggregatedResult, Candidate, EnsembleOutput, NO_ANSWER},
};
pub use prompt::PromptTemplate;
