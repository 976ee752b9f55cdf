//! Agent domain
//!
//! A council member's per-question state: the evidence it holds, the
//! sequence of chunks that evidence was built from, and every intermediate
//! opinion reached along the way.

pub mod entities;
pub mod value_objects;
