//! Progress notification port
//!
//! Defines the interface for reporting progress during a benchmark run.

use docquorum_domain::{AgentId, ConsensusDecision, Phase};

/// Callback for progress updates during a run
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (progress bar, plain text, nothing).
pub trait ProgressNotifier: Send + Sync {
    /// Called when a repetition starts
    fn on_run_start(&self, _repetition: usize, _total_questions: usize) {}

    /// Called when a phase starts
    fn on_phase_start(&self, phase: &Phase, total_agents: usize);

    /// Called when one agent finishes a phase
    fn on_agent_complete(&self, phase: &Phase, agent: AgentId, success: bool);

    /// Called when a phase completes for every agent
    fn on_phase_complete(&self, phase: &Phase);

    /// Called once the council has answered a question
    fn on_question_complete(&self, _index: usize, _decision: &ConsensusDecision) {}

    /// Called when a repetition finishes
    fn on_run_complete(&self, _repetition: usize) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_phase_start(&self, _phase: &Phase, _total_agents: usize) {}
    fn on_agent_complete(&self, _phase: &Phase, _agent: AgentId, _success: bool) {}
    fn on_phase_complete(&self, _phase: &Phase) {}
}
