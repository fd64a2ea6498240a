//! Use cases
//!
//! Application-level operations that orchestrate domain logic.
//!
//! The three stages can be run individually or chained by
//! [`run_ensemble::RunEnsembleUseCase`].

pub mod aggregate;
pub mod generate_drafts;
pub mod peer_review;
pub mod run_ensemble;
pub(crate) mod shared;

#[cfg(test)]
pub(crate) mod test_support;
