//! Result store port
//!
//! Persists the run artifact. Every save replaces the whole artifact for a
//! repetition, so a crash loses at most the question in flight.

use docquorum_domain::QuestionOutcome;
use thiserror::Error;

/// Errors that can occur while persisting results
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error writing {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Sink for per-repetition results
pub trait ResultStore: Send + Sync {
    /// Replace the artifact for `repetition` with `outcomes`
    fn save(&self, repetition: usize, outcomes: &[QuestionOutcome]) -> Result<(), StoreError>;
}
