//! Configuration file loading for docquorum
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `DOCQUORUM_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./docquorum.toml` or `./.docquorum.toml`
//! 4. Global: `<platform config dir>/docquorum/config.toml`
//! 5. Default values
//!
//! Command-line flags are applied on top by the binary.

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileConfig, FileCouncilConfig, FileEndpointConfig, FileRetryConfig,
    FileRunConfig,
};
pub use loader::ConfigLoader;
