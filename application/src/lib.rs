//! Application layer for docquorum
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod retry;
pub mod use_cases;

// Re-export commonly used types
pub use config::CouncilParams;
pub use ports::{
    dataset::{DatasetError, DatasetSource},
    progress::{NoProgress, ProgressNotifier},
    reasoning_endpoint::{EndpointError, ReasoningEndpoint},
    result_store::{ResultStore, StoreError},
};
pub use retry::{BackoffPolicy, call_with_backoff};
pub use use_cases::agent::CouncilAgent;
pub use use_cases::run_benchmark::{RunBenchmarkError, RunBenchmarkInput, RunBenchmarkUseCase};
pub use use_cases::run_council::{RunCouncilError, RunCouncilUseCase};
