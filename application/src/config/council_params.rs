//! Council parameters: phase loop control.
//!
//! [`CouncilParams`] groups the static parameters that control the phase
//! loops in [`RunCouncilUseCase`](crate::use_cases::run_council::RunCouncilUseCase).

use crate::retry::BackoffPolicy;
use docquorum_domain::DEFAULT_CHUNK_TOKEN_LIMIT;
use serde::{Deserialize, Serialize};

/// Phase loop control parameters.
///
/// | Phase    | Reissue attempts |
/// |----------|------------------|
/// | Confirm  | 6                |
/// | Exchange | 6                |
/// | Refine   | 12               |
/// | Decide   | 6                |
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouncilParams {
    /// Token ceiling applied to a chunk before it enters a prompt.
    pub chunk_token_limit: usize,
    pub confirm_attempts: usize,
    pub exchange_attempts: usize,
    /// Attempts per refine step (one candidate sequence).
    pub refine_attempts: usize,
    pub decide_attempts: usize,
    /// Agents processed at once inside a phase. 1 runs them in order.
    pub max_concurrency: usize,
    /// Transport retry policy for every endpoint call.
    pub backoff: BackoffPolicy,
}

impl Default for CouncilParams {
    fn default() -> Self {
        Self {
            chunk_token_limit: DEFAULT_CHUNK_TOKEN_LIMIT,
            confirm_attempts: 6,
            exchange_attempts: 6,
            refine_attempts: 12,
            decide_attempts: 6,
            max_concurrency: 1,
            backoff: BackoffPolicy::default(),
        }
    }
}

impl CouncilParams {
    // ==================== Builder Methods ====================

    pub fn with_chunk_token_limit(mut self, limit: usize) -> Self {
        self.chunk_token_limit = limit;
        self
    }

    pub fn with_confirm_attempts(mut self, attempts: usize) -> Self {
        self.confirm_attempts = attempts;
        self
    }

    pub fn with_exchange_attempts(mut self, attempts: usize) -> Self {
        self.exchange_attempts = attempts;
        self
    }

    pub fn with_refine_attempts(mut self, attempts: usize) -> Self {
        self.refine_attempts = attempts;
        self
    }

    pub fn with_decide_attempts(mut self, attempts: usize) -> Self {
        self.decide_attempts = attempts;
        self
    }

    pub fn with_max_concurrency(mut self, max: usize) -> Self {
        self.max_concurrency = max.max(1);
        self
    }

    pub fn with_backoff(mut self, backoff: BackoffPolicy) -> Self {
        self.backoff = backoff;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let params = CouncilParams::default();
        assert_eq!(params.chunk_token_limit, 32_768);
        assert_eq!(params.confirm_attempts, 6);
        assert_eq!(params.exchange_attempts, 6);
        assert_eq!(params.refine_attempts, 12);
        assert_eq!(params.decide_attempts, 6);
        assert_eq!(params.max_concurrency, 1);
        assert_eq!(params.backoff.max_attempts, 5);
    }

    #[test]
    fn test_builder() {
        let params = CouncilParams::default()
            .with_refine_attempts(3)
            .with_max_concurrency(0)
            .with_backoff(BackoffPolicy::none());

        assert_eq!(params.refine_attempts, 3);
        assert_eq!(params.max_concurrency, 1);
        assert_eq!(params.backoff.max_attempts, 1);
    }
}
