//! Backend adapters implementing the application's gateway port

pub mod http;
pub mod registry;

pub use http::{HttpBackendFactory, HttpTextGenerator};
pub use registry::{BackendFactory, BackendRegistry};
