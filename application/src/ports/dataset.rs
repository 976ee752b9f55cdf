//! Dataset port
//!
//! Source of question items for a benchmark run.

use docquorum_domain::QuestionItem;
use thiserror::Error;

/// Errors that can occur while loading questions
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("File not found: {0}")]
    NotFound(String),

    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Missing field '{field}' in {context}")]
    MissingField { field: String, context: String },

    #[error("Position {position} out of range for {context} (0..={len})")]
    PositionOutOfRange {
        position: i64,
        len: usize,
        context: String,
    },
}

/// Loader of question items
pub trait DatasetSource: Send + Sync {
    /// Dataset name, for logs and artifact names
    fn name(&self) -> &str;

    /// Load at most `limit` items, in dataset order
    fn load(&self, limit: usize) -> Result<Vec<QuestionItem>, DatasetError>;
}
