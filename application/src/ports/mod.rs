//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod dataset;
pub mod progress;
pub mod reasoning_endpoint;
pub mod result_store;
