//! Reasoning endpoint port
//!
//! Defines the interface for sending a chat prompt to a reasoning model.

use async_trait::async_trait;
use docquorum_domain::Message;
use thiserror::Error;

/// Errors that can occur during an endpoint call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EndpointError {
    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Timeout")]
    Timeout,

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Malformed or empty response body: {0}")]
    MalformedBody(String),

    #[error("Request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Other error: {0}")]
    Other(String),
}

impl EndpointError {
    /// Whether retrying the same request may succeed.
    ///
    /// Rate limits, connection problems, timeouts, 5xx responses and
    /// missing bodies are transient; rejected requests and anything else
    /// are permanent.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            EndpointError::RateLimited(_)
                | EndpointError::Connection(_)
                | EndpointError::Timeout
                | EndpointError::Server { .. }
                | EndpointError::MalformedBody(_)
        )
    }
}

/// Stateless request/response access to a reasoning model
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait ReasoningEndpoint: Send + Sync {
    /// Model name, for logs
    fn model(&self) -> &str;

    /// Send one prompt and return the raw reply text
    async fn generate(&self, messages: &[Message]) -> Result<String, EndpointError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(EndpointError::RateLimited("slow down".to_string()).is_transient());
        assert!(EndpointError::Connection("reset".to_string()).is_transient());
        assert!(EndpointError::Timeout.is_transient());
        assert!(
            EndpointError::Server {
                status: 503,
                message: "busy".to_string()
            }
            .is_transient()
        );
        assert!(EndpointError::MalformedBody("no choices".to_string()).is_transient());
    }

    #[test]
    fn test_permanent_classification() {
        assert!(
            !EndpointError::Rejected {
                status: 401,
                message: "bad key".to_string()
            }
            .is_transient()
        );
        assert!(!EndpointError::Other("boom".to_string()).is_transient());
    }
}
