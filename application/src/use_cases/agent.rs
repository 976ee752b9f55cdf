//! Council agent
//!
//! Pairs one [`AgentState`] with the shared reasoning endpoint and runs the
//! agent's side of every phase. The agent never sees its peers directly:
//! the council hands it snapshots of whatever peer state a phase needs.

use crate::ports::reasoning_endpoint::{EndpointError, ReasoningEndpoint};
use crate::retry::{BackoffPolicy, call_with_backoff};
use docquorum_domain::{
    AgentId, AgentState, ConfirmReply, Decision, DocumentAssignment, DomainError, ExchangeReply,
    FinalReply, Message, Opinion, ParseError, Phase, PromptTemplate, RefineVerdict,
    parse_refine_verdict, parse_structured, permutations, preview, truncate_tokens,
};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// One member of the council
pub struct CouncilAgent<E: ReasoningEndpoint + 'static> {
    state: AgentState,
    endpoint: Arc<E>,
    backoff: BackoffPolicy,
}

impl<E: ReasoningEndpoint + 'static> CouncilAgent<E> {
    pub fn new(id: AgentId, endpoint: Arc<E>, backoff: BackoffPolicy) -> Self {
        Self {
            state: AgentState::new(id),
            endpoint,
            backoff,
        }
    }

    pub fn id(&self) -> AgentId {
        self.state.id()
    }

    pub fn state(&self) -> &AgentState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut AgentState {
        &mut self.state
    }

    /// One endpoint call with transport-level backoff
    pub async fn generate(&self, messages: &[Message]) -> Result<String, EndpointError> {
        call_with_backoff(&self.backoff, EndpointError::is_transient, || {
            self.endpoint.generate(messages)
        })
        .await
    }

    /// Ask until `parse` accepts a reply or `attempts` run out.
    ///
    /// Exhaustion is not an error: the caller gets `None` and degrades.
    pub async fn ask_with<T>(
        &self,
        phase: Phase,
        messages: &[Message],
        attempts: usize,
        parse: impl Fn(&str) -> Result<T, ParseError>,
    ) -> Option<T> {
        for attempt in 1..=attempts {
            match self.generate(messages).await {
                Ok(raw) => match parse(&raw) {
                    Ok(value) => return Some(value),
                    Err(e) => {
                        debug!(
                            "Agent {} {} reply unusable ({}): {}",
                            self.id(),
                            phase,
                            e,
                            preview(&raw, 120)
                        );
                        warn!(
                            "Agent {} {} attempt {}/{} unparseable: {}",
                            self.id(),
                            phase,
                            attempt,
                            attempts,
                            e
                        );
                    }
                },
                Err(e) => {
                    warn!(
                        "Agent {} {} attempt {}/{} failed: {}",
                        self.id(),
                        phase,
                        attempt,
                        attempts,
                        e
                    );
                }
            }
        }
        warn!(
            "Agent {} gave up on {} after {} attempts",
            self.id(),
            phase,
            attempts
        );
        None
    }

    /// Ask for a reply of type `T`
    pub async fn ask<T: DeserializeOwned>(
        &self,
        phase: Phase,
        messages: &[Message],
        attempts: usize,
    ) -> Option<T> {
        self.ask_with(phase, messages, attempts, parse_structured::<T>)
            .await
    }

    // ==================== Phases ====================

    /// Round 1: form an opinion from the agent's own chunk.
    ///
    /// Returns whether a usable reply arrived.
    pub async fn confirm_topic(&mut self, attempts: usize, token_limit: usize) -> bool {
        let messages = PromptTemplate::confirm(
            self.state.claim(),
            self.state.options(),
            truncate_tokens(self.state.chunk(), token_limit),
        );
        let reply: Option<ConfirmReply> = self.ask(Phase::Confirm, &messages, attempts).await;
        let success = reply.is_some();
        self.state.confirm(reply.map(Opinion::from));
        info!(
            "Agent {} confirmed: {}",
            self.id(),
            preview(&self.state.current().conclusion, 80)
        );
        success
    }

    /// Round 2: read the peers' opinions and pick whose chunks to visit.
    ///
    /// `published` holds every agent's opinion at the phase barrier; the
    /// agent's own entry is skipped.
    pub async fn exchange(
        &mut self,
        published: &[(AgentId, Opinion)],
        attempts: usize,
    ) -> bool {
        let me = self.id();
        let peers: Vec<(AgentId, &Opinion)> = published
            .iter()
            .filter(|(id, _)| *id != me)
            .map(|(id, opinion)| (*id, opinion))
            .collect();
        let messages = PromptTemplate::exchange(
            self.state.claim(),
            self.state.options(),
            self.state.current(),
            &peers,
        );

        let Some(reply) = self
            .ask::<ExchangeReply>(Phase::Exchange, &messages, attempts)
            .await
        else {
            return false;
        };

        let rejected = self
            .state
            .inspire(reply.peer_ids(), published.len(), reply.explanation);
        if !rejected.is_empty() {
            warn!("Agent {} named invalid peers {:?}", me, rejected);
        }
        info!(
            "Agent {} inspired by {:?}",
            me,
            self.state
                .inspired_peers()
                .iter()
                .map(|id| id.index())
                .collect::<Vec<_>>()
        );
        true
    }

    /// Round 3: walk every ordering of the inspired peers.
    ///
    /// Each ordering restarts from the sequence the agent held when the
    /// round began. A useless verdict closes that branch for good and ends
    /// the ordering; an already explored step is skipped in place.
    pub async fn refine(
        &mut self,
        assignment: &DocumentAssignment,
        attempts: usize,
        token_limit: usize,
    ) -> Result<(), DomainError> {
        let start = self.state.sequence().clone();
        let peers = self.state.inspired_peers().to_vec();

        for order in permutations(&peers) {
            self.state.rewind_to(start.clone())?;

            for target in order {
                let Some(candidate) = self.state.sequence().extended(target) else {
                    continue;
                };
                if self.state.is_explored(&candidate) {
                    debug!("Agent {} already explored {}", self.id(), candidate);
                    continue;
                }
                let Some(chunk) = assignment.chunk(target.index()) else {
                    warn!("Agent {} has no chunk for peer {}", self.id(), target);
                    continue;
                };

                let messages = PromptTemplate::refine(
                    self.state.claim(),
                    self.state.options(),
                    self.state.current(),
                    target,
                    truncate_tokens(chunk, token_limit),
                );
                let Some(verdict) = self
                    .ask_with(Phase::Refine, &messages, attempts, parse_refine_verdict)
                    .await
                else {
                    continue;
                };
                self.state.note_utility(target, verdict.utility());
                match verdict {
                    RefineVerdict::Useless => {
                        debug!("Agent {} dead end at {}", self.id(), candidate);
                        self.state.mark_dead_end(candidate)?;
                        break;
                    }
                    RefineVerdict::Useful(opinion) => {
                        debug!("Agent {} advanced to {}", self.id(), candidate);
                        self.state.advance(candidate, opinion)?;
                    }
                }
            }
        }

        info!(
            "Agent {} explored {} sequences ({} dead ends)",
            self.id(),
            self.state.opinions().len(),
            self.state.dead_ends().len()
        );
        Ok(())
    }

    /// Final round: choose an answer from the deepest opinions.
    ///
    /// Exhaustion leaves the agent abstaining.
    pub async fn decide(&mut self, attempts: usize) -> bool {
        let messages = PromptTemplate::final_round(
            self.state.claim(),
            self.state.options(),
            &self.state.deepest_opinions(),
        );
        let reply: Option<FinalReply> = self.ask(Phase::Decide, &messages, attempts).await;
        let success = reply.is_some();
        let decision = reply.map(|r| r.decision()).unwrap_or(Decision::Abstain);
        info!("Agent {} decided: {}", self.id(), decision);
        self.state.decide(decision);
        success
    }
}
