//! Ensemble domain
//!
//! This module contains the core concepts of the three-stage pipeline.
//!
//! # Flow
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │    Draft     │ ──▶ │ Peer Review  │ ──▶ │ Aggregation  │
//! │ 1 per backend│     │ judge × other│     │ synthesis    │
//! └──────────────┘     └──────────────┘     └──────────────┘
//!    Vec<Candidate>  scores/rationales     AggregatedResult
//! ```
//!
//! Each stage consumes the previous stage's candidate collection. A backend
//! that fails in one stage is simply absent from that stage's output.

pub mod entities;
pub mod parsing;
pub mod value_objects;

pub use entities::Stage;
pub use parsing::{DEFAULT_PEER_SCORE, MISSING_REASON, PeerVerdict, parse_peer_verdict};
pub use value_objects::{AggregatedResult, Candidate, EnsembleOutput, NO_ANSWER};
