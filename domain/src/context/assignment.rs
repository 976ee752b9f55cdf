//! Document assignment: one contiguous slice of the document per agent.

use super::tokens::estimate_tokens;
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// The per-agent slices of one document
///
/// `chunks[i]` is owned by agent `i`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentAssignment {
    pub chunks: Vec<String>,
    pub total_tokens: usize,
}

impl DocumentAssignment {
    pub fn chunk(&self, index: usize) -> Option<&str> {
        self.chunks.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

/// Split `document` into exactly `agent_count` chunks of similar token size.
///
/// Boundaries are pushed forward to the next whitespace so no word is split.
/// Short documents may leave trailing chunks empty.
pub fn assign_chunks(document: &str, agent_count: usize) -> Result<DocumentAssignment, DomainError> {
    if agent_count == 0 {
        return Err(DomainError::NoAgents);
    }

    let boundaries: Vec<usize> = document.char_indices().map(|(i, _)| i).collect();
    let total_chars = boundaries.len();

    let mut chunks = Vec::with_capacity(agent_count);
    let mut start = 0;
    for k in 1..=agent_count {
        let end = if k == agent_count {
            document.len()
        } else {
            let target = total_chars * k / agent_count;
            next_break(document, &boundaries, target).max(start)
        };
        chunks.push(document[start..end].trim().to_string());
        start = end;
    }

    Ok(DocumentAssignment {
        chunks,
        total_tokens: estimate_tokens(document),
    })
}

/// Byte offset of the first whitespace at or after char position `target`
fn next_break(document: &str, boundaries: &[usize], target: usize) -> usize {
    boundaries[target.min(boundaries.len())..]
        .iter()
        .copied()
        .find(|&i| document[i..].starts_with(char::is_whitespace))
        .unwrap_or(document.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exactly_agent_count_chunks() {
        let doc = "one two three four five six seven eight nine ten";
        for n in 1..=6 {
            let assignment = assign_chunks(doc, n).unwrap();
            assert_eq!(assignment.len(), n);
        }
    }

    #[test]
    fn test_chunks_preserve_all_words_in_order() {
        let doc = "alpha beta gamma delta epsilon zeta eta theta";
        let assignment = assign_chunks(doc, 3).unwrap();
        let rejoined = assignment
            .chunks
            .iter()
            .filter(|c| !c.is_empty())
            .cloned()
            .collect::<Vec<_>>()
            .join(" ");
        assert_eq!(rejoined, doc);
    }

    #[test]
    fn test_no_word_is_split() {
        let doc = "aaaaaaaaaa bbbbbbbbbb cccccccccc";
        let assignment = assign_chunks(doc, 2).unwrap();
        for chunk in &assignment.chunks {
            for word in chunk.split_whitespace() {
                assert!(doc.split_whitespace().any(|w| w == word));
            }
        }
    }

    #[test]
    fn test_short_document_leaves_empty_chunks() {
        let assignment = assign_chunks("solo", 3).unwrap();
        assert_eq!(assignment.len(), 3);
        assert_eq!(assignment.chunks.iter().filter(|c| !c.is_empty()).count(), 1);
    }

    #[test]
    fn test_total_tokens_reported() {
        let assignment = assign_chunks("abcdefgh", 2).unwrap();
        assert_eq!(assignment.total_tokens, 2);
    }

    #[test]
    fn test_zero_agents_rejected() {
        assert_eq!(assign_chunks("text", 0), Err(DomainError::NoAgents));
    }
}
