//! Backend descriptors and generation requests
//!
//! A backend is an external text-generation capability identified by a
//! string id. The domain only describes *what* to ask of it; how the call is
//! made lives behind the application layer's gateway port.

pub mod config;
