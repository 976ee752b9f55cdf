//! Application-level configuration.
//!
//! - [`CouncilParams`]: phase loop control (attempt limits, concurrency, backoff)

pub mod council_params;

pub use council_params::CouncilParams;
