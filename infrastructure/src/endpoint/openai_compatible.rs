//! OpenAI-compatible chat-completions client
//!
//! Serves both endpoint kinds: a hosted remote API and a self-hosted local
//! server. Only the [`EndpointProfile`] differs between them.

use async_trait::async_trait;
use docquorum_application::ports::reasoning_endpoint::{EndpointError, ReasoningEndpoint};
use docquorum_domain::{EndpointProfile, Message};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

/// Chat-completions request body
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    stream: bool,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// [`ReasoningEndpoint`] over an OpenAI-compatible HTTP API
pub struct OpenAiCompatibleEndpoint {
    client: reqwest::Client,
    profile: EndpointProfile,
    api_key: Option<String>,
}

impl OpenAiCompatibleEndpoint {
    pub fn new(
        profile: EndpointProfile,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, EndpointError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| EndpointError::Other(format!("Failed to build HTTP client: {}", e)))?;

        info!(
            kind = %profile.kind,
            model = %profile.model,
            base_url = %profile.base_url,
            "Reasoning endpoint configured"
        );

        Ok(Self {
            client,
            profile,
            api_key: api_key.filter(|key| !key.is_empty()),
        })
    }

    pub fn profile(&self) -> &EndpointProfile {
        &self.profile
    }

    fn request_body<'a>(&'a self, messages: &'a [Message]) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.profile.model,
            messages,
            stream: false,
            temperature: self.profile.temperature,
            top_p: self.profile.top_p,
            max_tokens: self.profile.max_tokens,
            response_format: self
                .profile
                .json_mode
                .then_some(ResponseFormat { kind: "json_object" }),
        }
    }
}

/// Map a non-success HTTP status to an endpoint error
fn classify_status(status: u16, body: String) -> EndpointError {
    match status {
        429 => EndpointError::RateLimited(body),
        408 => EndpointError::Timeout,
        500..=599 => EndpointError::Server {
            status,
            message: body,
        },
        _ => EndpointError::Rejected {
            status,
            message: body,
        },
    }
}

/// Map a transport-level failure to an endpoint error
fn classify_transport(e: reqwest::Error) -> EndpointError {
    if e.is_timeout() {
        EndpointError::Timeout
    } else if e.is_connect() || e.is_request() {
        EndpointError::Connection(e.to_string())
    } else if e.is_decode() || e.is_body() {
        EndpointError::MalformedBody(e.to_string())
    } else {
        EndpointError::Other(e.to_string())
    }
}

/// First choice's content; an absent or blank body counts as malformed
fn first_content(response: ChatResponse) -> Result<String, EndpointError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or_else(|| EndpointError::MalformedBody("response has no content".to_string()))
}

#[async_trait]
impl ReasoningEndpoint for OpenAiCompatibleEndpoint {
    fn model(&self) -> &str {
        &self.profile.model
    }

    async fn generate(&self, messages: &[Message]) -> Result<String, EndpointError> {
        let url = self.profile.completions_url();
        debug!("POST {} ({} messages)", url, messages.len());

        let mut request = self.client.post(&url).json(&self.request_body(messages));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(classify_transport)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status.as_u16(), body));
        }

        let body: ChatResponse = response.json().await.map_err(classify_transport)?;
        first_content(body)
    }
}
