//! Application-level configuration.
//!
//! - [`EnsembleParams`]: pipeline policy (top-K, worker pool, timeouts, review budget)

pub mod ensemble_params;

pub use ensemble_params::EnsembleParams;
