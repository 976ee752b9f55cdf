//! Vote counting primitives
//!
//! Counting is order-stable: values are reported in the order they were
//! first seen, so the same decision list always yields the same tally.

use crate::agent::value_objects::{ABSTAIN, Decision};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::hash::Hash;

/// Values with the highest occurrence count, in first-seen order.
///
/// More than one value is returned on a tie; an empty input yields nothing.
///
/// # Example
///
/// ```
/// use docquorum_domain::quorum::most_frequent;
///
/// assert_eq!(most_frequent(&["B", "C", "B"]), vec!["B"]);
/// assert_eq!(most_frequent(&["B", "C", "C", "B"]), vec!["B", "C"]);
/// ```
pub fn most_frequent<T: Eq + Hash + Clone>(items: &[T]) -> Vec<T> {
    let mut order: Vec<&T> = Vec::new();
    let mut counts: HashMap<&T, usize> = HashMap::new();
    for item in items {
        let count = counts.entry(item).or_insert(0);
        if *count == 0 {
            order.push(item);
        }
        *count += 1;
    }

    let Some(best) = counts.values().copied().max() else {
        return Vec::new();
    };
    order
        .into_iter()
        .filter(|item| counts[item] == best)
        .cloned()
        .collect()
}

/// Count of final decisions for one question
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTally {
    /// (answer, votes) in first-seen order
    pub counts: Vec<(String, usize)>,
    /// Agents that answered "None" or never produced a decision
    pub abstentions: usize,
}

impl VoteTally {
    pub fn from_decisions(decisions: &[Decision]) -> Self {
        let mut counts: Vec<(String, usize)> = Vec::new();
        let mut abstentions = 0;
        for decision in decisions {
            match decision.answer() {
                Some(answer) => match counts.iter_mut().find(|(a, _)| a == answer) {
                    Some((_, n)) => *n += 1,
                    None => counts.push((answer.to_string(), 1)),
                },
                None => abstentions += 1,
            }
        }
        Self {
            counts,
            abstentions,
        }
    }

    /// Answers holding the highest count (more than one on a tie)
    pub fn leaders(&self) -> Vec<String> {
        let answers: Vec<&str> = self
            .counts
            .iter()
            .flat_map(|(answer, n)| std::iter::repeat_n(answer.as_str(), *n))
            .collect();
        most_frequent(&answers)
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Compact summary such as `[B:2 C:2 None:1]`
    pub fn vote_summary(&self) -> String {
        let mut parts: Vec<String> = self
            .counts
            .iter()
            .map(|(answer, n)| format!("{}:{}", answer, n))
            .collect();
        if self.abstentions > 0 {
            parts.push(format!("{}:{}", ABSTAIN, self.abstentions));
        }
        format!("[{}]", parts.join(" "))
    }
}
