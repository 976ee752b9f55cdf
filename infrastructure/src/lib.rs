//! Infrastructure layer for docquorum
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod dataset;
pub mod endpoint;
pub mod logging;
pub mod results;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileConfig, FileCouncilConfig, FileEndpointConfig,
    FileRetryConfig, FileRunConfig,
};
pub use dataset::JsonDatasetLoader;
pub use endpoint::OpenAiCompatibleEndpoint;
pub use logging::{prepare_run_log, run_log_file_name};
pub use results::JsonResultStore;
