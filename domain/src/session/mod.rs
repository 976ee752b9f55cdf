//! Session domain - chat messages sent to a reasoning endpoint

pub mod entities;

pub use entities::{Message, Role};
