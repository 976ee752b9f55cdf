//! Consensus over the agents' final decisions

use super::vote::VoteTally;
use crate::agent::value_objects::Decision;
use serde::{Deserialize, Serialize};

/// What the vote alone settles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConsensusOutcome {
    /// Every agent abstained; the council answers "None"
    Abstained,
    /// Exactly one answer holds the highest count
    Majority(String),
    /// Several answers share the highest count and need adjudication
    Tied(Vec<String>),
}

impl ConsensusOutcome {
    pub fn from_tally(tally: &VoteTally) -> Self {
        let mut leaders = tally.leaders();
        match leaders.len() {
            0 => ConsensusOutcome::Abstained,
            1 => ConsensusOutcome::Majority(leaders.remove(0)),
            _ => ConsensusOutcome::Tied(leaders),
        }
    }

    /// The settled decision, if no tie-break is needed
    pub fn settled(&self) -> Option<Decision> {
        match self {
            ConsensusOutcome::Abstained => Some(Decision::Abstain),
            ConsensusOutcome::Majority(answer) => Some(Decision::Answer(answer.clone())),
            ConsensusOutcome::Tied(_) => None,
        }
    }
}

/// The council's answer to one question, with how it was reached
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsensusDecision {
    pub decision: Decision,
    pub tally: VoteTally,
    /// Candidates sent to adjudication (empty if none was needed)
    pub tied: Vec<String>,
}

impl ConsensusDecision {
    pub fn settled(decision: Decision, tally: VoteTally) -> Self {
        Self {
            decision,
            tally,
            tied: Vec::new(),
        }
    }

    pub fn tie_broken(decision: Decision, tally: VoteTally, tied: Vec<String>) -> Self {
        Self {
            decision,
            tally,
            tied,
        }
    }

    pub fn was_tied(&self) -> bool {
        !self.tied.is_empty()
    }
}
