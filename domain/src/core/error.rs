//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Unsupported model: {0}")]
    UnsupportedModel(String),

    #[error("Unsupported dataset: {0}")]
    UnsupportedDataset(String),

    #[error("A council needs at least one agent")]
    NoAgents,

    #[error("Sequence {0} is already recorded")]
    SequenceAlreadyRecorded(String),

    #[error("Sequence {0} is a dead end")]
    DeadEndConflict(String),

    #[error("Sequence {0} does not extend a recorded opinion")]
    OrphanSequence(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_model_display() {
        let error = DomainError::UnsupportedModel("gpt-2".to_string());
        assert_eq!(error.to_string(), "Unsupported model: gpt-2");
    }

    #[test]
    fn test_sequence_error_display() {
        let error = DomainError::OrphanSequence("(0, 1)".to_string());
        assert_eq!(error.to_string(), "Sequence (0, 1) does not extend a recorded opinion");
    }
}
