//! Agent domain entities

use super::value_objects::{AgentId, ChunkSequence, Decision, Opinion, Utility};
use crate::core::error::DomainError;
use crate::core::question::OptionSet;
use std::collections::{BTreeMap, BTreeSet};

/// Per-question state of one council member (Entity)
///
/// Only `id` survives [`AgentState::reset`]. Everything else belongs to the
/// question currently being answered.
///
/// The opinion cache and the dead-end set are append-only and disjoint, and
/// every recorded sequence extends either another recorded sequence or the
/// agent's own origin. The mutators below refuse writes that would break
/// these rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentState {
    id: AgentId,
    chunk: String,
    claim: String,
    options: OptionSet,
    current: Opinion,
    explanation: String,
    inspired_peers: Vec<AgentId>,
    sequence: ChunkSequence,
    opinions: BTreeMap<ChunkSequence, Opinion>,
    dead_ends: BTreeSet<ChunkSequence>,
    utility_by_source: BTreeMap<AgentId, Utility>,
    final_decision: Decision,
}

impl AgentState {
    pub fn new(id: AgentId) -> Self {
        Self {
            id,
            chunk: String::new(),
            claim: String::new(),
            options: OptionSet::default(),
            current: Opinion::default(),
            explanation: String::new(),
            inspired_peers: Vec::new(),
            sequence: ChunkSequence::default(),
            opinions: BTreeMap::new(),
            dead_ends: BTreeSet::new(),
            utility_by_source: BTreeMap::new(),
            final_decision: Decision::Abstain,
        }
    }

    // ==================== Accessors ====================

    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn chunk(&self) -> &str {
        &self.chunk
    }

    pub fn claim(&self) -> &str {
        &self.claim
    }

    pub fn options(&self) -> &OptionSet {
        &self.options
    }

    /// Latest evidence and conclusion
    pub fn current(&self) -> &Opinion {
        &self.current
    }

    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    pub fn inspired_peers(&self) -> &[AgentId] {
        &self.inspired_peers
    }

    pub fn sequence(&self) -> &ChunkSequence {
        &self.sequence
    }

    pub fn opinions(&self) -> &BTreeMap<ChunkSequence, Opinion> {
        &self.opinions
    }

    pub fn dead_ends(&self) -> &BTreeSet<ChunkSequence> {
        &self.dead_ends
    }

    pub fn utility_by_source(&self) -> &BTreeMap<AgentId, Utility> {
        &self.utility_by_source
    }

    pub fn final_decision(&self) -> &Decision {
        &self.final_decision
    }

    // ==================== Question Lifecycle ====================

    /// Load the question and this agent's slice of the document
    pub fn begin_question(
        &mut self,
        claim: impl Into<String>,
        options: OptionSet,
        chunk: impl Into<String>,
    ) {
        self.claim = claim.into();
        self.options = options;
        self.chunk = chunk.into();
    }

    /// Record the result of reading the agent's own chunk.
    ///
    /// `None` means every attempt failed; the origin sequence is still
    /// recorded (with an empty opinion) so later rounds have a starting point.
    pub fn confirm(&mut self, opinion: Option<Opinion>) {
        if let Some(opinion) = opinion {
            self.current = opinion;
        }
        let origin = ChunkSequence::origin(self.id);
        self.sequence = origin.clone();
        self.opinions
            .entry(origin)
            .or_insert_with(|| self.current.clone());
    }

    /// Store the peers worth following up on.
    ///
    /// Ids are deduplicated in first-seen order. The agent's own id and ids
    /// outside `0..pool_size` are dropped and returned to the caller.
    pub fn inspire(
        &mut self,
        ids: impl IntoIterator<Item = usize>,
        pool_size: usize,
        explanation: impl Into<String>,
    ) -> Vec<usize> {
        let mut rejected = Vec::new();
        let mut peers: Vec<AgentId> = Vec::new();
        for raw in ids {
            let id = AgentId::new(raw);
            if raw >= pool_size || id == self.id {
                rejected.push(raw);
            } else if !peers.contains(&id) {
                peers.push(id);
            }
        }
        self.inspired_peers = peers;
        self.explanation = explanation.into();
        rejected
    }

    /// Whether `sequence` was already recorded or marked as a dead end
    pub fn is_explored(&self, sequence: &ChunkSequence) -> bool {
        self.opinions.contains_key(sequence) || self.dead_ends.contains(sequence)
    }

    /// Move the working sequence back to an already-reached point
    pub fn rewind_to(&mut self, sequence: ChunkSequence) -> Result<(), DomainError> {
        if !self.opinions.contains_key(&sequence) {
            return Err(DomainError::OrphanSequence(sequence.to_string()));
        }
        self.sequence = sequence;
        Ok(())
    }

    /// Adopt a new opinion reached by visiting `sequence`
    pub fn advance(&mut self, sequence: ChunkSequence, opinion: Opinion) -> Result<(), DomainError> {
        self.check_unexplored(&sequence)?;
        let extends_known = sequence
            .parent()
            .is_some_and(|parent| self.opinions.contains_key(&parent));
        if !extends_known && sequence != ChunkSequence::origin(self.id) {
            return Err(DomainError::OrphanSequence(sequence.to_string()));
        }

        self.current = opinion.clone();
        self.sequence = sequence.clone();
        self.opinions.insert(sequence, opinion);
        Ok(())
    }

    /// Mark `sequence` as yielding nothing new
    pub fn mark_dead_end(&mut self, sequence: ChunkSequence) -> Result<(), DomainError> {
        self.check_unexplored(&sequence)?;
        self.dead_ends.insert(sequence);
        Ok(())
    }

    pub fn note_utility(&mut self, source: AgentId, utility: Utility) {
        self.utility_by_source.insert(source, utility);
    }

    /// Every opinion at the greatest sequence length reached
    pub fn deepest_opinions(&self) -> Vec<(&ChunkSequence, &Opinion)> {
        let Some(max_len) = self.opinions.keys().map(ChunkSequence::len).max() else {
            return Vec::new();
        };
        self.opinions
            .iter()
            .filter(|(sequence, _)| sequence.len() == max_len)
            .collect()
    }

    pub fn decide(&mut self, decision: Decision) {
        self.final_decision = decision;
    }

    /// Clear all per-question fields, keeping identity
    pub fn reset(&mut self) {
        *self = Self::new(self.id);
    }

    fn check_unexplored(&self, sequence: &ChunkSequence) -> Result<(), DomainError> {
        if self.opinions.contains_key(sequence) {
            return Err(DomainError::SequenceAlreadyRecorded(sequence.to_string()));
        }
        if self.dead_ends.contains(sequence) {
            return Err(DomainError::DeadEndConflict(sequence.to_string()));
        }
        Ok(())
    }
}
