//! Progress reporting for council runs

use crate::output::console::ConsoleFormatter;
use colored::Colorize;
use docquorum_application::ports::progress::ProgressNotifier;
use docquorum_domain::{AgentId, ConsensusDecision, Phase};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::Mutex;

/// Reports progress with a question bar and a per-phase agent bar
pub struct ProgressReporter {
    multi: MultiProgress,
    question_bar: Mutex<Option<ProgressBar>>,
    phase_bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            question_bar: Mutex::new(None),
            phase_bar: Mutex::new(None),
        }
    }

    fn question_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} ({elapsed_precise}) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn phase_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("  {spinner:.green} {prefix:.bold} [{bar:20.green/white}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    /// Print a line above the bars without tearing them
    fn println(&self, line: String) {
        if self.multi.println(&line).is_err() {
            println!("{}", line);
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_run_start(&self, repetition: usize, total_questions: usize) {
        let pb = self.multi.add(ProgressBar::new(total_questions as u64));
        pb.set_style(Self::question_style());
        pb.set_prefix(format!("Run {}", repetition));
        pb.set_message("Processing Questions");
        *self.question_bar.lock().unwrap_or_else(|e| e.into_inner()) = Some(pb);
    }

    fn on_phase_start(&self, phase: &Phase, total_agents: usize) {
        let pb = self.multi.add(ProgressBar::new(total_agents as u64));
        pb.set_style(Self::phase_style());
        pb.set_prefix(phase.display_name().to_string());
        *self.phase_bar.lock().unwrap_or_else(|e| e.into_inner()) = Some(pb);
    }

    fn on_agent_complete(&self, _phase: &Phase, agent: AgentId, success: bool) {
        if let Some(pb) = self.phase_bar.lock().unwrap_or_else(|e| e.into_inner()).as_ref() {
            let status = if success {
                format!("{} agent {}", "v".green(), agent)
            } else {
                format!("{} agent {}", "x".red(), agent)
            };
            pb.set_message(status);
            pb.inc(1);
        }
    }

    fn on_phase_complete(&self, _phase: &Phase) {
        if let Some(pb) = self.phase_bar.lock().unwrap_or_else(|e| e.into_inner()).take() {
            pb.finish_and_clear();
            self.multi.remove(&pb);
        }
    }

    fn on_question_complete(&self, index: usize, decision: &ConsensusDecision) {
        self.println(ConsoleFormatter::decision_line(index, decision));
        if let Some(pb) = self.question_bar.lock().unwrap_or_else(|e| e.into_inner()).as_ref() {
            pb.inc(1);
        }
    }

    fn on_run_complete(&self, _repetition: usize) {
        if let Some(pb) = self.question_bar.lock().unwrap_or_else(|e| e.into_inner()).take() {
            pb.finish_with_message("done".green().to_string());
        }
    }
}

/// Plain output: only the per-question decision lines
pub struct SimpleProgress;

impl ProgressNotifier for SimpleProgress {
    fn on_phase_start(&self, _phase: &Phase, _total_agents: usize) {}

    fn on_agent_complete(&self, _phase: &Phase, _agent: AgentId, _success: bool) {}

    fn on_phase_complete(&self, _phase: &Phase) {}

    fn on_question_complete(&self, index: usize, decision: &ConsensusDecision) {
        println!("{}", ConsoleFormatter::decision_line(index, decision));
    }
}
