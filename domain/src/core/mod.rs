//! Core domain concepts shared across all subdomains.
//!
//! - [`error::DomainError`]: domain-level errors
//! - [`string`]: echo-stripping and excerpt helpers for backend text
//! - [`task::TaskInfo`]: built-in task identifiers and their labels

pub mod error;
pub mod string;
pub mod task;
