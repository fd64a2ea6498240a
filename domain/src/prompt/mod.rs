//! Prompt domain
//!
//! Templates for generating prompts at each stage of the ensemble flow.

mod template;

pub use template::PromptTemplate;
