//! Scripted endpoint shared by the use case tests

use crate::ports::reasoning_endpoint::{EndpointError, ReasoningEndpoint};
use async_trait::async_trait;
use docquorum_domain::Message;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Endpoint that replays a fixed script and records every prompt.
///
/// Once the script runs out every call fails permanently.
pub struct ScriptedEndpoint {
    responses: Mutex<VecDeque<Result<String, EndpointError>>>,
    prompts: Mutex<Vec<Vec<Message>>>,
}

impl ScriptedEndpoint {
    pub fn new<S: Into<String>>(responses: impl IntoIterator<Item = S>) -> Self {
        Self::from_results(responses.into_iter().map(|r| Ok(r.into())))
    }

    pub fn from_results(responses: impl IntoIterator<Item = Result<String, EndpointError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn prompts(&self) -> Vec<Vec<Message>> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn remaining(&self) -> usize {
        self.responses.lock().unwrap().len()
    }
}

#[async_trait]
impl ReasoningEndpoint for ScriptedEndpoint {
    fn model(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, messages: &[Message]) -> Result<String, EndpointError> {
        self.prompts.lock().unwrap().push(messages.to_vec());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(EndpointError::Other("script exhausted".to_string())))
    }
}
