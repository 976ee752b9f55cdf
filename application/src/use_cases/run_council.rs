//! Run Council use case
//!
//! Orchestrates one question through the council:
//!
//! ```text
//! ASSIGN → CONFIRM → EXCHANGE → REFINE → DECIDE → (tie-break)
//! ```
//!
//! Every phase is a barrier: it completes for all agents, successfully or
//! by exhausting its attempts, before the next one starts. Within a phase
//! agents are processed up to `max_concurrency` at a time, results kept in
//! agent order.

use crate::config::CouncilParams;
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::ports::reasoning_endpoint::ReasoningEndpoint;
use crate::use_cases::agent::CouncilAgent;
use docquorum_domain::{
    AgentId, ChunkSequence, ConsensusDecision, ConsensusOutcome, Decision, DocumentAssignment,
    DomainError, FinalReply, Opinion, Phase, PromptTemplate, QuestionItem, VoteTally,
    assign_chunks, estimate_tokens, parse_structured, preview,
};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur while answering one question
#[derive(Error, Debug)]
pub enum RunCouncilError {
    #[error("No agents configured")]
    NoAgents,

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Use case for running the council on one question at a time
pub struct RunCouncilUseCase<E: ReasoningEndpoint + 'static> {
    agents: Vec<CouncilAgent<E>>,
    params: CouncilParams,
}

impl<E: ReasoningEndpoint + 'static> RunCouncilUseCase<E> {
    /// Build a pool of `agent_count` agents sharing one endpoint
    pub fn new(
        endpoint: Arc<E>,
        agent_count: usize,
        params: CouncilParams,
    ) -> Result<Self, RunCouncilError> {
        if agent_count == 0 {
            return Err(RunCouncilError::NoAgents);
        }
        let agents = (0..agent_count)
            .map(|i| CouncilAgent::new(AgentId::new(i), Arc::clone(&endpoint), params.backoff.clone()))
            .collect();
        Ok(Self { agents, params })
    }

    pub fn agents(&self) -> &[CouncilAgent<E>] {
        &self.agents
    }

    pub fn params(&self) -> &CouncilParams {
        &self.params
    }

    /// Clear every agent's per-question state
    pub fn reset(&mut self) {
        for agent in &mut self.agents {
            agent.state_mut().reset();
        }
    }

    /// Answer one question with default (no-op) progress
    pub async fn execute(
        &mut self,
        item: &QuestionItem,
    ) -> Result<ConsensusDecision, RunCouncilError> {
        self.execute_with_progress(item, &NoProgress).await
    }

    /// Answer one question with progress callbacks
    pub async fn execute_with_progress(
        &mut self,
        item: &QuestionItem,
        progress: &dyn ProgressNotifier,
    ) -> Result<ConsensusDecision, RunCouncilError> {
        info!(
            "Council of {} agents on: {}",
            self.agents.len(),
            preview(&item.question, 80)
        );

        let assignment = self.phase_assign(item, progress)?;
        self.phase_confirm(progress).await;
        self.phase_exchange(progress).await;
        self.phase_refine(&assignment, progress).await?;
        self.phase_decide(progress).await;

        Ok(self.resolve(item, progress).await)
    }

    /// Split the context and hand each agent its chunk
    fn phase_assign(
        &mut self,
        item: &QuestionItem,
        progress: &dyn ProgressNotifier,
    ) -> Result<DocumentAssignment, RunCouncilError> {
        progress.on_phase_start(&Phase::Assign, self.agents.len());

        let assignment = assign_chunks(&item.context, self.agents.len())?;
        info!(
            "Assigned {} tokens across {} agents",
            assignment.total_tokens,
            assignment.len()
        );
        for (agent, chunk) in self.agents.iter_mut().zip(&assignment.chunks) {
            debug!("Agent {} holds {} tokens", agent.id(), estimate_tokens(chunk));
            agent
                .state_mut()
                .begin_question(item.question.clone(), item.options.clone(), chunk.clone());
            progress.on_agent_complete(&Phase::Assign, agent.id(), true);
        }

        progress.on_phase_complete(&Phase::Assign);
        Ok(assignment)
    }

    /// Phase 1: every agent reads its own chunk
    async fn phase_confirm(&mut self, progress: &dyn ProgressNotifier) {
        info!("Phase 1: {}", Phase::Confirm.display_name());
        progress.on_phase_start(&Phase::Confirm, self.agents.len());

        let attempts = self.params.confirm_attempts;
        let limit = self.params.chunk_token_limit;
        stream::iter(self.agents.iter_mut().map(|agent| async move {
            let success = agent.confirm_topic(attempts, limit).await;
            progress.on_agent_complete(&Phase::Confirm, agent.id(), success);
        }))
        .buffered(self.params.max_concurrency.max(1))
        .collect::<Vec<_>>()
        .await;

        progress.on_phase_complete(&Phase::Confirm);
    }

    /// Phase 2: every agent reads the others' phase-1 opinions
    async fn phase_exchange(&mut self, progress: &dyn ProgressNotifier) {
        info!("Phase 2: {}", Phase::Exchange.display_name());
        progress.on_phase_start(&Phase::Exchange, self.agents.len());

        let published: Vec<(AgentId, Opinion)> = self
            .agents
            .iter()
            .map(|agent| (agent.id(), agent.state().current().clone()))
            .collect();
        let published = &published;
        let attempts = self.params.exchange_attempts;
        stream::iter(self.agents.iter_mut().map(|agent| async move {
            let success = agent.exchange(published, attempts).await;
            progress.on_agent_complete(&Phase::Exchange, agent.id(), success);
        }))
        .buffered(self.params.max_concurrency.max(1))
        .collect::<Vec<_>>()
        .await;

        progress.on_phase_complete(&Phase::Exchange);
    }

    /// Phase 3: every agent explores its inspired peers' chunks
    async fn phase_refine(
        &mut self,
        assignment: &DocumentAssignment,
        progress: &dyn ProgressNotifier,
    ) -> Result<(), RunCouncilError> {
        info!("Phase 3: {}", Phase::Refine.display_name());
        progress.on_phase_start(&Phase::Refine, self.agents.len());

        let attempts = self.params.refine_attempts;
        let limit = self.params.chunk_token_limit;
        let results = stream::iter(self.agents.iter_mut().map(|agent| async move {
            let result = agent.refine(assignment, attempts, limit).await;
            progress.on_agent_complete(&Phase::Refine, agent.id(), result.is_ok());
            result
        }))
        .buffered(self.params.max_concurrency.max(1))
        .collect::<Vec<_>>()
        .await;

        progress.on_phase_complete(&Phase::Refine);
        results.into_iter().collect::<Result<Vec<_>, _>>()?;
        Ok(())
    }

    /// Phase 4: every agent picks a final answer
    async fn phase_decide(&mut self, progress: &dyn ProgressNotifier) {
        info!("Phase 4: {}", Phase::Decide.display_name());
        progress.on_phase_start(&Phase::Decide, self.agents.len());

        let attempts = self.params.decide_attempts;
        stream::iter(self.agents.iter_mut().map(|agent| async move {
            let success = agent.decide(attempts).await;
            progress.on_agent_complete(&Phase::Decide, agent.id(), success);
        }))
        .buffered(self.params.max_concurrency.max(1))
        .collect::<Vec<_>>()
        .await;

        progress.on_phase_complete(&Phase::Decide);
    }

    /// Aggregate the votes, adjudicating a tie if there is one
    async fn resolve(
        &self,
        item: &QuestionItem,
        progress: &dyn ProgressNotifier,
    ) -> ConsensusDecision {
        let decisions: Vec<Decision> = self
            .agents
            .iter()
            .map(|agent| agent.state().final_decision().clone())
            .collect();
        let tally = VoteTally::from_decisions(&decisions);
        info!("Votes: {}", tally.vote_summary());

        match ConsensusOutcome::from_tally(&tally) {
            ConsensusOutcome::Tied(candidates) => {
                progress.on_phase_start(&Phase::TieBreak, 1);
                let decision = self.tie_break(item, &candidates).await;
                progress.on_phase_complete(&Phase::TieBreak);
                ConsensusDecision::tie_broken(decision, tally, candidates)
            }
            outcome => {
                let decision = outcome.settled().unwrap_or_default();
                ConsensusDecision::settled(decision, tally)
            }
        }
    }

    /// One adjudication call; falls back to the first candidate on failure
    async fn tie_break(&self, item: &QuestionItem, candidates: &[String]) -> Decision {
        info!("Tie between {:?}, adjudicating", candidates);
        let fallback = || {
            candidates
                .first()
                .map(|c| Decision::Answer(c.clone()))
                .unwrap_or_default()
        };
        let Some(adjudicator) = self.agents.first() else {
            return fallback();
        };

        let views: Vec<(AgentId, &Decision, Vec<(&ChunkSequence, &Opinion)>)> = self
            .agents
            .iter()
            .map(|agent| {
                let state = agent.state();
                (
                    state.id(),
                    state.final_decision(),
                    state.opinions().iter().collect(),
                )
            })
            .collect();
        let messages =
            PromptTemplate::tie_break(&item.question, &item.options, candidates, &views);

        let raw = match adjudicator.generate(&messages).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Tie-break call failed: {}; using first candidate", e);
                return fallback();
            }
        };
        let pick = match parse_structured::<FinalReply>(&raw) {
            Ok(reply) => reply.decision(),
            Err(e) => {
                warn!("Tie-break reply unusable: {}; using first candidate", e);
                return fallback();
            }
        };

        match pick {
            Decision::Answer(answer) => {
                let matched = candidates
                    .iter()
                    .find(|c| c.trim().eq_ignore_ascii_case(answer.trim()));
                match matched {
                    Some(candidate) => Decision::Answer(candidate.clone()),
                    None => {
                        warn!("Tie-break picked {} outside {:?}", answer, candidates);
                        Decision::Answer(answer)
                    }
                }
            }
            Decision::Abstain => {
                warn!("Tie-break abstained; using first candidate");
                fallback()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::reasoning_endpoint::EndpointError;
    use crate::retry::BackoffPolicy;
    use crate::use_cases::test_support::ScriptedEndpoint;
    use docquorum_domain::{OptionSet, Utility};
    use std::collections::HashSet;

    fn item(context: &str) -> QuestionItem {
        QuestionItem::new(
            "Who took the letter?",
            OptionSet::from_list(["The butler", "The cook", "The maid"]),
            "A",
            context,
        )
    }

    fn council(
        endpoint: &Arc<ScriptedEndpoint>,
        agents: usize,
    ) -> RunCouncilUseCase<ScriptedEndpoint> {
        let params = CouncilParams::default().with_backoff(BackoffPolicy::none());
        RunCouncilUseCase::new(Arc::clone(endpoint), agents, params).unwrap()
    }

    fn confirm(answer: &str) -> String {
        format!(r#"{{"evidence": "saw {answer}", "answer": "{answer}"}}"#)
    }

    fn no_peers() -> String {
        r#"{"id": "", "explanation": "nothing useful"}"#.to_string()
    }

    fn result(answer: &str) -> String {
        format!(r#"{{"result": "{answer}"}}"#)
    }

    fn system_prompt(prompt: &[docquorum_domain::Message]) -> &str {
        &prompt[0].content
    }

    // ==================== Construction Tests ====================

    #[test]
    fn test_zero_agents_rejected() {
        let endpoint = Arc::new(ScriptedEndpoint::new(Vec::<String>::new()));
        let result = RunCouncilUseCase::new(endpoint, 0, CouncilParams::default());
        assert!(matches!(result, Err(RunCouncilError::NoAgents)));
    }

    // ==================== Consensus Tests ====================

    #[tokio::test]
    async fn test_majority_without_tie_break() {
        let endpoint = Arc::new(ScriptedEndpoint::new([
            confirm("A"),
            confirm("A"),
            confirm("B"),
            no_peers(),
            no_peers(),
            no_peers(),
            result("A"),
            result("A"),
            result("B"),
        ]));
        let mut council = council(&endpoint, 3);

        let decision = council.execute(&item("one two three four five six")).await.unwrap();

        assert_eq!(decision.decision, Decision::Answer("A".to_string()));
        assert!(!decision.was_tied());
        assert_eq!(endpoint.call_count(), 9);
    }

    #[tokio::test]
    async fn test_all_abstain_skips_tie_break() {
        let endpoint = Arc::new(ScriptedEndpoint::new([
            confirm("None"),
            confirm("None"),
            confirm("None"),
            no_peers(),
            no_peers(),
            no_peers(),
            result("None"),
            result("None"),
            result("None"),
        ]));
        let mut council = council(&endpoint, 3);

        let decision = council.execute(&item("a b c d e f")).await.unwrap();

        assert!(decision.decision.is_abstain());
        assert_eq!(decision.tally.abstentions, 3);
        assert_eq!(endpoint.call_count(), 9);
        assert_eq!(endpoint.remaining(), 0);
    }

    #[tokio::test]
    async fn test_tie_invokes_adjudication_once() {
        let endpoint = Arc::new(ScriptedEndpoint::new([
            confirm("B"),
            confirm("B"),
            confirm("C"),
            confirm("C"),
            no_peers(),
            no_peers(),
            no_peers(),
            no_peers(),
            result("B"),
            result("B"),
            result("C"),
            result("C"),
            result("c"),
        ]));
        let mut council = council(&endpoint, 4);

        let decision = council.execute(&item("w x y z w x y z")).await.unwrap();

        assert_eq!(decision.decision, Decision::Answer("C".to_string()));
        assert_eq!(decision.tied, vec!["B".to_string(), "C".to_string()]);
        assert_eq!(endpoint.call_count(), 13);

        let prompts = endpoint.prompts();
        let tie_prompt = &prompts[12];
        assert!(system_prompt(tie_prompt).contains("B, C"));
        let user = &tie_prompt[1].content;
        for agent in 0..4 {
            assert!(user.contains(&format!("Agent {}", agent)));
        }
        assert!(user.contains("saw B"));
        assert!(user.contains("saw C"));
    }

    #[tokio::test]
    async fn test_tie_break_failure_falls_back_to_first_candidate() {
        let endpoint = Arc::new(ScriptedEndpoint::new([
            confirm("B"),
            confirm("C"),
            no_peers(),
            no_peers(),
            result("B"),
            result("C"),
            "no idea".to_string(),
        ]));
        let mut council = council(&endpoint, 2);

        let decision = council.execute(&item("left right")).await.unwrap();

        assert_eq!(decision.decision, Decision::Answer("B".to_string()));
        assert!(decision.was_tied());
    }

    #[tokio::test]
    async fn test_tie_break_prompt_carries_every_cached_opinion() {
        let endpoint = Arc::new(ScriptedEndpoint::new([
            confirm("B"),
            confirm("C"),
            r#"{"id": "[1]", "explanation": "disagrees"}"#.to_string(),
            no_peers(),
            r#"{"utility": "useful", "fact": "DEEPER_FACT", "conclusion": "B"}"#.to_string(),
            result("B"),
            result("C"),
            result("B"),
        ]));
        let mut council = council(&endpoint, 2);

        let decision = council.execute(&item("left right")).await.unwrap();

        assert_eq!(decision.decision, Decision::Answer("B".to_string()));
        assert_eq!(endpoint.call_count(), 8);
        assert_eq!(council.agents()[0].state().opinions().len(), 2);

        let prompts = endpoint.prompts();
        let tie = &prompts[7][1].content;
        assert!(tie.contains("Chunks (0): evidence: saw B"));
        assert!(tie.contains("Chunks (0, 1): evidence: DEEPER_FACT"));
        assert!(tie.contains("Chunks (1): evidence: saw C"));
    }

    // ==================== Refine Tests ====================

    #[tokio::test]
    async fn test_refine_explores_both_orderings_without_duplicates() {
        let endpoint = Arc::new(ScriptedEndpoint::new([
            confirm("A"),
            confirm("B"),
            confirm("B"),
            r#"{"id": "[1, 2]", "explanation": "they disagree"}"#.to_string(),
            no_peers(),
            no_peers(),
            // agent 0, order (1, 2)
            r#"{"utility": "useful", "fact": "f01", "conclusion": "B"}"#.to_string(),
            r#"{"utility": "useful", "fact": "f012", "conclusion": "B"}"#.to_string(),
            // agent 0, order (2, 1)
            r#"{"utility": "useful", "fact": "f02", "conclusion": "B"}"#.to_string(),
            r#"{"utility": "useful", "fact": "f021", "conclusion": "B"}"#.to_string(),
            result("B"),
            result("B"),
            result("B"),
        ]));
        let mut council = council(&endpoint, 3);

        let decision = council.execute(&item("one two three four five six")).await.unwrap();
        assert_eq!(decision.decision, Decision::Answer("B".to_string()));

        let refine_prompts: Vec<_> = endpoint
            .prompts()
            .into_iter()
            .filter(|p| p[1].content.contains("new document chunk"))
            .collect();
        assert_eq!(refine_prompts.len(), 4);

        let state = council.agents()[0].state();
        assert_eq!(state.opinions().len(), 5);
        let deepest: HashSet<String> = state
            .deepest_opinions()
            .iter()
            .map(|(seq, _)| seq.to_string())
            .collect();
        assert_eq!(deepest.len(), 2);
    }

    #[tokio::test]
    async fn test_dead_end_skipped_in_later_ordering() {
        let endpoint = Arc::new(ScriptedEndpoint::new([
            confirm("A"),
            confirm("B"),
            confirm("C"),
            r#"{"id": "1 and 2", "explanation": "check both"}"#.to_string(),
            no_peers(),
            no_peers(),
            // order (1, 2): (0,1) useless, walk stops
            r#"{"utility": "useless"}"#.to_string(),
            // order (2, 1): (0,2) useful, then (0,2,1) useless
            r#"{"utility": "useful", "fact": "f02", "conclusion": "C"}"#.to_string(),
            r#"{"utility": "useless"}"#.to_string(),
            result("C"),
            result("B"),
            result("C"),
        ]));
        let mut council = council(&endpoint, 3);

        council.execute(&item("one two three four five six")).await.unwrap();

        let state = council.agents()[0].state();
        assert_eq!(state.dead_ends().len(), 2);
        assert_eq!(state.utility_by_source()[&AgentId::new(1)], Utility::Useless);
        assert_eq!(state.utility_by_source()[&AgentId::new(2)], Utility::Useful);
        for dead in state.dead_ends() {
            assert!(!state.opinions().contains_key(dead));
        }
        assert_eq!(endpoint.call_count(), 12);
        assert_eq!(endpoint.remaining(), 0);
    }

    #[tokio::test]
    async fn test_dead_ends_never_reissued_across_orderings() {
        // Agent 0 follows peers 1, 2 and 3. Every step is useless, so each
        // first step is asked once and later orderings skip past them.
        let endpoint = Arc::new(ScriptedEndpoint::new([
            confirm("A"),
            confirm("A"),
            confirm("A"),
            confirm("B"),
            r#"{"id": "[1, 2, 3]", "explanation": "x"}"#.to_string(),
            no_peers(),
            no_peers(),
            no_peers(),
            // (1,2,3): (0,1) useless
            r#"{"utility": "useless"}"#.to_string(),
            // (1,3,2): (0,1) skipped, (0,3) useless
            r#"{"utility": "useless"}"#.to_string(),
            // (2,1,3): (0,2) useless; remaining orderings only skip
            r#"{"utility": "useless"}"#.to_string(),
            result("A"),
            result("A"),
            result("A"),
            result("B"),
        ]));
        let mut council = council(&endpoint, 4);

        let decision = council
            .execute(&item("one two three four five six seven eight"))
            .await
            .unwrap();

        assert_eq!(decision.decision, Decision::Answer("A".to_string()));
        assert_eq!(endpoint.call_count(), 15);
        assert_eq!(endpoint.remaining(), 0);

        let refine_prompts: Vec<String> = endpoint
            .prompts()
            .into_iter()
            .filter(|p| p[1].content.contains("new document chunk"))
            .map(|p| p[0].content.clone())
            .collect();
        let unique: HashSet<&String> = refine_prompts.iter().collect();
        assert_eq!(refine_prompts.len(), 3);
        assert_eq!(unique.len(), 3);

        let state = council.agents()[0].state();
        assert_eq!(state.dead_ends().len(), 3);
        assert_eq!(state.opinions().len(), 1);
    }

    // ==================== Retry Tests ====================

    #[tokio::test(start_paused = true)]
    async fn test_transient_timeouts_absorbed_by_backoff() {
        let mut script: Vec<Result<String, EndpointError>> =
            (0..4).map(|_| Err(EndpointError::Timeout)).collect();
        script.push(Ok(confirm("A")));
        script.push(Ok(no_peers()));
        script.push(Ok(result("A")));
        let endpoint = Arc::new(ScriptedEndpoint::from_results(script));
        let params = CouncilParams::default();
        let mut council = RunCouncilUseCase::new(Arc::clone(&endpoint), 1, params).unwrap();

        let decision = council.execute(&item("solo document")).await.unwrap();

        assert_eq!(endpoint.call_count(), 7);
        let confirm_calls = endpoint
            .prompts()
            .iter()
            .filter(|p| p[1].content.contains("document chunk:"))
            .count();
        assert_eq!(confirm_calls, 5);
        assert_eq!(council.agents()[0].state().current().conclusion, "A");
        assert_eq!(decision.decision, Decision::Answer("A".to_string()));
    }

    #[tokio::test]
    async fn test_exhausted_agent_abstains_without_aborting() {
        let endpoint = Arc::new(ScriptedEndpoint::new([
            confirm("A"),
            "junk".to_string(),
            no_peers(),
            no_peers(),
            result("A"),
        ]));
        let params = CouncilParams::default()
            .with_backoff(BackoffPolicy::none())
            .with_confirm_attempts(1)
            .with_decide_attempts(1);
        let mut council = RunCouncilUseCase::new(Arc::clone(&endpoint), 2, params).unwrap();

        let decision = council.execute(&item("one two")).await.unwrap();

        assert_eq!(decision.decision, Decision::Answer("A".to_string()));
        assert!(council.agents()[1].state().final_decision().is_abstain());
    }

    // ==================== Barrier and Reset Tests ====================

    #[tokio::test]
    async fn test_exchange_sees_all_phase_one_opinions_when_concurrent() {
        let endpoint = Arc::new(ScriptedEndpoint::new([
            confirm("A"),
            confirm("B"),
            confirm("C"),
            no_peers(),
            no_peers(),
            no_peers(),
            result("A"),
            result("B"),
            result("C"),
            result("A"),
        ]));
        let params = CouncilParams::default()
            .with_backoff(BackoffPolicy::none())
            .with_max_concurrency(3);
        let mut council = RunCouncilUseCase::new(Arc::clone(&endpoint), 3, params).unwrap();

        council.execute(&item("one two three four five six")).await.unwrap();

        let prompts = endpoint.prompts();
        for exchange in &prompts[3..6] {
            let user = &exchange[1].content;
            let peers = ["saw A", "saw B", "saw C"]
                .iter()
                .filter(|s| user.contains(*s))
                .count();
            assert_eq!(peers, 3);
        }
    }

    #[tokio::test]
    async fn test_reset_clears_question_state() {
        let endpoint = Arc::new(ScriptedEndpoint::new([
            confirm("A"),
            no_peers(),
            result("A"),
        ]));
        let mut council = council(&endpoint, 1);
        council.execute(&item("solo")).await.unwrap();
        assert!(!council.agents()[0].state().opinions().is_empty());

        council.reset();

        let state = council.agents()[0].state();
        assert_eq!(state.id(), AgentId::new(0));
        assert!(state.opinions().is_empty());
        assert!(state.sequence().is_empty());
        assert!(state.final_decision().is_abstain());
        assert!(state.chunk().is_empty());
    }
}
