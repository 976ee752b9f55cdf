//! Console output formatter for council runs

use colored::Colorize;
use docquorum_domain::{ConsensusDecision, RunSummary};

/// Formats run results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// The per-question line: `[Q<n>] Final Decision: <decision>`
    pub fn decision_line(index: usize, consensus: &ConsensusDecision) -> String {
        let decision = consensus.decision.to_string();
        let decision = if consensus.decision.is_abstain() {
            decision.dimmed()
        } else {
            decision.green().bold()
        };
        let mut line = format!("[Q{}] Final Decision: {}", index, decision);
        if consensus.was_tied() {
            line.push_str(&format!(
                " {}",
                format!("(tie-break over {})", consensus.tied.join(", ")).yellow()
            ));
        }
        line
    }

    /// Format every repetition's accuracy
    pub fn format(summaries: &[RunSummary]) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Run Summary"));
        output.push('\n');

        for summary in summaries {
            output.push_str(&format!(
                "{} accuracy {} ({}/{} correct, {} abstained)\n",
                format!("Repetition {}:", summary.repetition).cyan().bold(),
                format!("{:.1}%", summary.accuracy() * 100.0).bold(),
                summary.correct,
                summary.total,
                summary.abstained
            ));
        }

        if summaries.len() > 1 {
            let mean = summaries.iter().map(RunSummary::accuracy).sum::<f64>()
                / summaries.len() as f64;
            output.push_str(&format!(
                "{} {}\n",
                "Mean accuracy:".cyan().bold(),
                format!("{:.1}%", mean * 100.0).bold()
            ));
        }

        output.push_str(&Self::footer());
        output
    }

    /// Format as JSON
    pub fn format_json(summaries: &[RunSummary]) -> String {
        serde_json::to_string_pretty(summaries).unwrap_or_else(|_| "[]".to_string())
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn footer() -> String {
        format!("{}\n", "=".repeat(60).cyan())
    }
}
