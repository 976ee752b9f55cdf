//! Orchestration value objects - per-question results of a run

use crate::agent::value_objects::Decision;
use serde::{Deserialize, Serialize};

/// One row of the run artifact: `{question, final_decision, label}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOutcome {
    /// Index of the question within the run
    pub question: usize,
    pub final_decision: Decision,
    /// Ground-truth answer
    pub label: String,
}

impl QuestionOutcome {
    pub fn new(question: usize, final_decision: Decision, label: impl Into<String>) -> Self {
        Self {
            question,
            final_decision,
            label: label.into(),
        }
    }

    /// Whether the council's answer matches the label (case-insensitive)
    pub fn is_correct(&self) -> bool {
        self.final_decision
            .answer()
            .is_some_and(|answer| answer.trim().eq_ignore_ascii_case(self.label.trim()))
    }
}

/// Score of one repetition
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub repetition: usize,
    pub total: usize,
    pub correct: usize,
    pub abstained: usize,
}

impl RunSummary {
    pub fn from_outcomes(repetition: usize, outcomes: &[QuestionOutcome]) -> Self {
        Self {
            repetition,
            total: outcomes.len(),
            correct: outcomes.iter().filter(|o| o.is_correct()).count(),
            abstained: outcomes
                .iter()
                .filter(|o| o.final_decision.is_abstain())
                .count(),
        }
    }

    /// Fraction of questions answered correctly (0.0 when nothing ran)
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f64 / self.total as f64
        }
    }
}
