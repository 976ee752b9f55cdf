//! Orchestration domain - the phases of a council round and their results

pub mod entities;
pub mod permutation;
pub mod value_objects;

pub use entities::Phase;
pub use permutation::permutations;
pub use value_objects::{QuestionOutcome, RunSummary};
