//! Dataset adapters

mod json_loader;

pub use json_loader::{JsonDatasetLoader, combine_before_position, strip_citation_markers};
