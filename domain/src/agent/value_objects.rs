//! Value objects describing an agent's provenance and opinions

use serde::{Deserialize, Serialize};

/// Stable identity of an agent within a run (Value Object)
///
/// The id doubles as the index of the document chunk the agent owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(usize);

impl AgentId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for AgentId {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

/// Ordered list of chunk owners whose evidence has been incorporated
///
/// A sequence never contains the same id twice; [`ChunkSequence::extended`]
/// refuses to build one that would.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChunkSequence(Vec<AgentId>);

impl ChunkSequence {
    /// The length-1 sequence an agent starts from
    pub fn origin(id: AgentId) -> Self {
        Self(vec![id])
    }

    /// Build from raw ids, rejecting repeats
    pub fn try_from_ids(ids: impl IntoIterator<Item = AgentId>) -> Option<Self> {
        let mut sequence = Self::default();
        for id in ids {
            sequence = sequence.extended(id)?;
        }
        Some(sequence)
    }

    /// This sequence followed by `id`, or `None` if `id` was already visited
    pub fn extended(&self, id: AgentId) -> Option<Self> {
        if self.contains(id) {
            return None;
        }
        let mut ids = self.0.clone();
        ids.push(id);
        Some(Self(ids))
    }

    /// The sequence without its last element
    pub fn parent(&self) -> Option<Self> {
        match self.0.split_last() {
            Some((_, rest)) if !rest.is_empty() => Some(Self(rest.to_vec())),
            _ => None,
        }
    }

    pub fn contains(&self, id: AgentId) -> bool {
        self.0.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for ChunkSequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ids: Vec<String> = self.0.iter().map(|id| id.to_string()).collect();
        write!(f, "({})", ids.join(", "))
    }
}

/// Evidence and the answer it supports, as held after visiting a sequence
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opinion {
    pub evidence: String,
    pub conclusion: String,
}

impl Opinion {
    pub fn new(evidence: impl Into<String>, conclusion: impl Into<String>) -> Self {
        Self {
            evidence: evidence.into(),
            conclusion: conclusion.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.evidence.is_empty() && self.conclusion.is_empty()
    }
}

impl std::fmt::Display for Opinion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "evidence: {}\nanswer: {}", self.evidence, self.conclusion)
    }
}

/// Verdict on whether a peer's chunk added anything
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Utility {
    Useful,
    Useless,
}

impl Utility {
    /// Anything other than an explicit "useless" counts as useful.
    pub fn from_reply(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("useless") {
            Utility::Useless
        } else {
            Utility::Useful
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Utility::Useful => "useful",
            Utility::Useless => "useless",
        }
    }
}

impl std::fmt::Display for Utility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sentinel text for "no answer"
pub const ABSTAIN: &str = "None";

/// An agent's final pick, or an abstention
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Decision {
    Answer(String),
    #[default]
    Abstain,
}

impl Decision {
    /// Interpret raw endpoint output; blank or "None" means abstain
    pub fn from_reply(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(ABSTAIN) {
            Decision::Abstain
        } else {
            Decision::Answer(trimmed.to_string())
        }
    }

    pub fn answer(&self) -> Option<&str> {
        match self {
            Decision::Answer(a) => Some(a),
            Decision::Abstain => None,
        }
    }

    pub fn is_abstain(&self) -> bool {
        matches!(self, Decision::Abstain)
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.answer().unwrap_or(ABSTAIN))
    }
}

impl From<String> for Decision {
    fn from(value: String) -> Self {
        Decision::from_reply(&value)
    }
}

impl From<Decision> for String {
    fn from(value: Decision) -> Self {
        value.to_string()
    }
}
