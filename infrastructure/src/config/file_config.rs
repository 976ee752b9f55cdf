//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Every field has a default, so any subset of the file may be given.
//!
//! ```toml
//! [endpoint]
//! kind = "deepseek"          # or "llama"
//! api_key_env = "API_KEY"
//!
//! [council]
//! agent_count = 5
//! refine_attempts = 12
//!
//! [retry]
//! max_attempts = 5
//!
//! [run]
//! dataset = "NovelQA"
//! sample_num = 10
//! ```

use docquorum_application::{BackoffPolicy, CouncilParams};
use docquorum_domain::{
    DEFAULT_CHUNK_TOKEN_LIMIT, DatasetKind, DomainError, EndpointKind, EndpointProfile,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error)]
pub enum ConfigValidationError {
    #[error("agent_count cannot be 0")]
    ZeroAgents,

    #[error("{0} cannot be 0")]
    ZeroAttempts(&'static str),

    #[error("timeout_secs cannot be 0")]
    InvalidTimeout,

    #[error("retry multiplier must be at least 1.0, got {0}")]
    InvalidMultiplier(f64),

    #[error(transparent)]
    Unsupported(#[from] DomainError),
}

/// Raw endpoint configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileEndpointConfig {
    /// Endpoint selector: `deepseek`/`remote` or `llama`/`local`
    pub kind: String,
    /// Model name sent to the API (defaults per kind)
    pub model: Option<String>,
    /// Override of the kind's default base URL
    pub base_url: Option<String>,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Direct API key (not recommended, use the env var instead)
    pub api_key: Option<String>,
    /// HTTP timeout per request
    pub timeout_secs: u64,
}

impl Default for FileEndpointConfig {
    fn default() -> Self {
        Self {
            kind: "llama".to_string(),
            model: None,
            base_url: None,
            api_key_env: "API_KEY".to_string(),
            api_key: None,
            timeout_secs: 120,
        }
    }
}

impl FileEndpointConfig {
    pub fn endpoint_kind(&self) -> Result<EndpointKind, DomainError> {
        EndpointKind::from_str(&self.kind)
    }

    /// Connection profile with overrides applied
    pub fn profile(&self) -> Result<EndpointProfile, DomainError> {
        let mut profile = EndpointProfile::for_kind(self.endpoint_kind()?);
        if let Some(model) = &self.model {
            profile = profile.with_model(model.clone());
        }
        if let Some(base_url) = &self.base_url {
            profile = profile.with_base_url(base_url.clone());
        }
        Ok(profile)
    }

    /// Direct key first, then the configured environment variable
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .filter(|key| !key.is_empty())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Raw council configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCouncilConfig {
    pub agent_count: usize,
    pub chunk_token_limit: usize,
    pub confirm_attempts: usize,
    pub exchange_attempts: usize,
    pub refine_attempts: usize,
    pub decide_attempts: usize,
    /// Agents working at once inside a phase (1 = one after another)
    pub max_concurrency: usize,
}

impl Default for FileCouncilConfig {
    fn default() -> Self {
        let params = CouncilParams::default();
        Self {
            agent_count: 5,
            chunk_token_limit: DEFAULT_CHUNK_TOKEN_LIMIT,
            confirm_attempts: params.confirm_attempts,
            exchange_attempts: params.exchange_attempts,
            refine_attempts: params.refine_attempts,
            decide_attempts: params.decide_attempts,
            max_concurrency: params.max_concurrency,
        }
    }
}

/// Raw retry configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRetryConfig {
    pub max_attempts: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    pub multiplier: f64,
}

impl Default for FileRetryConfig {
    fn default() -> Self {
        let policy = BackoffPolicy::default();
        Self {
            max_attempts: policy.max_attempts,
            initial_delay_ms: policy.initial_delay.as_millis() as u64,
            max_delay_ms: policy.max_delay.as_millis() as u64,
            multiplier: policy.multiplier,
        }
    }
}

impl FileRetryConfig {
    pub fn policy(&self) -> BackoffPolicy {
        BackoffPolicy::default()
            .with_max_attempts(self.max_attempts)
            .with_initial_delay(Duration::from_millis(self.initial_delay_ms))
            .with_max_delay(Duration::from_millis(self.max_delay_ms))
            .with_multiplier(self.multiplier)
    }
}

/// Raw run configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRunConfig {
    /// `DetectiveQA` or `NovelQA`
    pub dataset: String,
    pub dataset_dir: PathBuf,
    /// Questions taken from the head of the dataset
    pub sample_num: usize,
    pub repetition_num: usize,
    pub results_dir: PathBuf,
    pub logs_dir: PathBuf,
}

impl Default for FileRunConfig {
    fn default() -> Self {
        Self {
            dataset: DatasetKind::DetectiveQa.as_str().to_string(),
            dataset_dir: PathBuf::from("../datasets"),
            sample_num: 1,
            repetition_num: 2,
            results_dir: PathBuf::from("../results"),
            logs_dir: PathBuf::from("../logs"),
        }
    }
}

impl FileRunConfig {
    pub fn dataset_kind(&self) -> Result<DatasetKind, DomainError> {
        DatasetKind::from_str(&self.dataset)
    }
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Reasoning endpoint settings
    pub endpoint: FileEndpointConfig,
    /// Council settings
    pub council: FileCouncilConfig,
    /// Transport retry settings
    pub retry: FileRetryConfig,
    /// Benchmark run settings
    pub run: FileRunConfig,
}

impl FileConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        self.endpoint.endpoint_kind()?;
        self.run.dataset_kind()?;

        if self.endpoint.timeout_secs == 0 {
            return Err(ConfigValidationError::InvalidTimeout);
        }
        if self.council.agent_count == 0 {
            return Err(ConfigValidationError::ZeroAgents);
        }

        let attempts = [
            ("confirm_attempts", self.council.confirm_attempts),
            ("exchange_attempts", self.council.exchange_attempts),
            ("refine_attempts", self.council.refine_attempts),
            ("decide_attempts", self.council.decide_attempts),
            ("max_concurrency", self.council.max_concurrency),
            ("retry.max_attempts", self.retry.max_attempts as usize),
        ];
        if let Some((name, _)) = attempts.iter().find(|(_, value)| *value == 0) {
            return Err(ConfigValidationError::ZeroAttempts(*name));
        }

        if self.retry.multiplier < 1.0 {
            return Err(ConfigValidationError::InvalidMultiplier(self.retry.multiplier));
        }

        Ok(())
    }

    /// Phase loop parameters for the council
    pub fn council_params(&self) -> CouncilParams {
        CouncilParams::default()
            .with_chunk_token_limit(self.council.chunk_token_limit)
            .with_confirm_attempts(self.council.confirm_attempts)
            .with_exchange_attempts(self.council.exchange_attempts)
            .with_refine_attempts(self.council.refine_attempts)
            .with_decide_attempts(self.council.decide_attempts)
            .with_max_concurrency(self.council.max_concurrency)
            .with_backoff(self.retry.policy())
    }
}
