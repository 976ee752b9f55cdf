//! Use cases (application services)

pub mod agent;
pub mod run_benchmark;
pub mod run_council;

#[cfg(test)]
pub(crate) mod test_support;
