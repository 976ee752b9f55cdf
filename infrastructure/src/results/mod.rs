//! Run artifact persistence

mod json_store;

pub use json_store::JsonResultStore;
