//! Document context - token budgeting and chunk assignment

pub mod assignment;
pub mod tokens;

pub use assignment::{DocumentAssignment, assign_chunks};
pub use tokens::{DEFAULT_CHUNK_TOKEN_LIMIT, estimate_tokens, truncate_tokens};
