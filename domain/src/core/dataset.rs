//! Dataset selector

use super::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Supported long-document QA benchmarks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DatasetKind {
    /// Detective novels; each question sees the text up to its answer position
    DetectiveQa,
    /// Full novels; only multi-hop (`mh`) questions are used
    NovelQa,
}

impl DatasetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetKind::DetectiveQa => "DetectiveQA",
            DatasetKind::NovelQa => "NovelQA",
        }
    }
}

impl std::fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DatasetKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "detectiveqa" => Ok(DatasetKind::DetectiveQa),
            "novelqa" => Ok(DatasetKind::NovelQa),
            _ => Err(DomainError::UnsupportedDataset(s.to_string())),
        }
    }
}
