//! Prompt domain
//!
//! Templates for the prompts each council round sends.

mod template;

pub use template::{PromptTemplate, TemplateName};
