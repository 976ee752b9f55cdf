//! Quorum consensus domain
//!
//! Turns the agents' individual final decisions into one council answer and
//! reads the structured replies the agents produce along the way.
//!
//! ```text
//! decisions ──▶ VoteTally ──▶ ConsensusOutcome
//!                               ├─ Abstained  → "None"
//!                               ├─ Majority   → answer
//!                               └─ Tied       → tie-break adjudication
//! ```

pub mod consensus;
pub mod parsing;
pub mod vote;

// Re-export main types
pub use consensus::{ConsensusDecision, ConsensusOutcome};
pub use parsing::{
    ConfirmReply, ExchangeReply, FinalReply, ParseError, RefineReply, RefineVerdict,
    extract_ids, extract_json_object, parse_refine_verdict, parse_structured,
};
pub use vote::{VoteTally, most_frequent};
