//! Domain layer for docquorum
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Council
//!
//! A fixed pool of agents each holds one disjoint chunk of a long document.
//! No single chunk answers the question, so the agents negotiate over four
//! rounds:
//!
//! 1. **Confirm**: each agent forms a hypothesis from its own chunk
//! 2. **Exchange**: agents read each other's hypotheses and pick peers to follow up on
//! 3. **Refine**: agents read their chosen peers' chunks in every order, caching
//!    each opinion by the sequence of chunks it was built from
//! 4. **Decide**: agents pick one answer; a majority vote (with tie-break)
//!    produces the council's answer

pub mod agent;
pub mod context;
pub mod core;
pub mod orchestration;
pub mod prompt;
pub mod providers;
pub mod quorum;
pub mod session;

// Re-export commonly used types
pub use agent::{
    entities::AgentState,
    value_objects::{ABSTAIN, AgentId, ChunkSequence, Decision, Opinion, Utility},
};
pub use context::{
    DEFAULT_CHUNK_TOKEN_LIMIT, DocumentAssignment, assign_chunks, estimate_tokens, truncate_tokens,
};
pub use core::{
    dataset::DatasetKind,
    error::DomainError,
    question::{AnswerOption, OptionSet, QuestionItem},
    string::preview,
};
pub use orchestration::{Phase, QuestionOutcome, RunSummary, permutations};
pub use prompt::{PromptTemplate, TemplateName};
pub use providers::{EndpointKind, EndpointProfile};
pub use quorum::{
    ConfirmReply, ConsensusDecision, ConsensusOutcome, ExchangeReply, FinalReply, ParseError,
    RefineReply, RefineVerdict, VoteTally, extract_ids, most_frequent, parse_refine_verdict,
    parse_structured,
};
pub use session::{Message, Role};
