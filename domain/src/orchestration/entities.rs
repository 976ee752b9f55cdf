//! Orchestration domain entities

use serde::{Deserialize, Serialize};

/// Phase of a council round for one question
///
/// Phases run as barriers: no agent enters a phase before every agent has
/// finished the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Split the document into one chunk per agent
    Assign,
    /// Each agent reads its own chunk and forms a hypothesis
    Confirm,
    /// Agents read each other's hypotheses and pick peers to follow up on
    Exchange,
    /// Agents walk permutations of their chosen peers' chunks
    Refine,
    /// Each agent picks one answer among its deepest opinions
    Decide,
    /// Adjudication between answers tied for the majority
    TieBreak,
}

impl Phase {
    pub fn as_str(&self) -> &str {
        match self {
            Phase::Assign => "assign",
            Phase::Confirm => "confirm",
            Phase::Exchange => "exchange",
            Phase::Refine => "refine",
            Phase::Decide => "decide",
            Phase::TieBreak => "tie_break",
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            Phase::Assign => "Assign Documents",
            Phase::Confirm => "Initial Topic Confirm",
            Phase::Exchange => "Exchange Fact",
            Phase::Refine => "Refine Topic",
            Phase::Decide => "Final Decision",
            Phase::TieBreak => "Tie Break",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_names() {
        assert_eq!(Phase::Refine.as_str(), "refine");
        assert_eq!(Phase::Confirm.to_string(), "Initial Topic Confirm");
    }
}
