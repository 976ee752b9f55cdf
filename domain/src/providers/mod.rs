//! Reasoning endpoint profiles (provider-neutral, serde-free).
//!
//! Both deployment variants speak the same chat-completions protocol. They
//! differ only in where they live and how they sample, so they are modeled
//! as one [`EndpointProfile`] value built from an [`EndpointKind`].

use crate::core::error::DomainError;
use std::str::FromStr;

/// Where the reasoning model is deployed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndpointKind {
    /// Hosted API (DeepSeek)
    Remote,
    /// Self-hosted OpenAI-compatible server (Llama)
    Local,
}

impl EndpointKind {
    /// Selector name used on the command line and in result file names
    pub fn as_str(&self) -> &'static str {
        match self {
            EndpointKind::Remote => "deepseek",
            EndpointKind::Local => "llama",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            EndpointKind::Remote => "https://api.deepseek.com",
            EndpointKind::Local => "http://127.0.0.1:8000/v1",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            EndpointKind::Remote => "deepseek-chat",
            EndpointKind::Local => "llama",
        }
    }
}

impl std::fmt::Display for EndpointKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EndpointKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "deepseek" | "remote" => Ok(EndpointKind::Remote),
            "llama" | "local" => Ok(EndpointKind::Local),
            _ => Err(DomainError::UnsupportedModel(s.to_string())),
        }
    }
}

/// Connection and sampling parameters for one endpoint.
///
/// Sampling is pinned to its minimum (temperature 0, and top-p 0 for local
/// servers) so repeated runs see the same replies as far as the backend
/// allows.
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointProfile {
    pub kind: EndpointKind,
    /// Model name sent with each request
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub top_p: Option<f32>,
    /// Output length cap (None = provider default)
    pub max_tokens: Option<u32>,
    /// Ask for `response_format = {"type": "json_object"}`
    pub json_mode: bool,
}

impl EndpointProfile {
    pub fn for_kind(kind: EndpointKind) -> Self {
        match kind {
            EndpointKind::Remote => Self {
                kind,
                model: kind.default_model().to_string(),
                base_url: kind.default_base_url().to_string(),
                temperature: 0.0,
                top_p: None,
                max_tokens: None,
                json_mode: true,
            },
            EndpointKind::Local => Self {
                kind,
                model: kind.default_model().to_string(),
                base_url: kind.default_base_url().to_string(),
                temperature: 0.0,
                top_p: Some(0.0),
                max_tokens: Some(2048),
                json_mode: true,
            },
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Chat-completions URL for this profile
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}
