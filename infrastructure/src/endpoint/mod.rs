//! Reasoning endpoint adapters

mod openai_compatible;

pub use openai_compatible::OpenAiCompatibleEndpoint;
