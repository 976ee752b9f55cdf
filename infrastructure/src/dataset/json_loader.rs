//! JSON dataset loader for DetectiveQA and NovelQA
//!
//! Expected layout under the dataset directory:
//!
//! ```text
//! DetectiveQA/human_anno.json   { "<novel>": { "questions": [ ... ] } }
//! DetectiveQA/novel_data.json   { "<novel>": { "origin_text": [ ... ] } }
//! NovelQA/data.json             [ { "question", "options", "answer", "context", "complexity" } ]
//! ```

use docquorum_application::ports::dataset::{DatasetError, DatasetSource};
use docquorum_domain::{DatasetKind, OptionSet, QuestionItem};
use regex::Regex;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::info;

/// Inline citation markers such as `[12] `
static CITATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\d+\]\s*").expect("CITATION_RE regex should compile"));

/// NovelQA complexity tag for multi-hop questions
const MULTI_HOP: &str = "mh";

#[derive(Debug, Deserialize)]
struct AnnotatedNovel {
    #[serde(default)]
    questions: Vec<AnnotatedQuestion>,
}

#[derive(Debug, Deserialize)]
struct AnnotatedQuestion {
    question: String,
    options: OptionSet,
    answer: String,
    answer_position: i64,
}

#[derive(Debug, Deserialize)]
struct NovelText {
    origin_text: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct NovelQaItem {
    question: String,
    options: OptionSet,
    answer: String,
    context: String,
    #[serde(default)]
    complexity: Option<String>,
}

/// Remove `[n]` citation markers and the whitespace after them
pub fn strip_citation_markers(text: &str) -> String {
    CITATION_RE.replace_all(text, "").into_owned()
}

/// Join the first `position` sentences of a novel, markers stripped.
///
/// `position` may equal the sentence count (the whole text).
pub fn combine_before_position(
    sentences: &[String],
    position: i64,
    context: &str,
) -> Result<String, DatasetError> {
    let end = usize::try_from(position)
        .ok()
        .filter(|&end| end <= sentences.len())
        .ok_or_else(|| DatasetError::PositionOutOfRange {
            position,
            len: sentences.len(),
            context: context.to_string(),
        })?;

    Ok(sentences[..end]
        .iter()
        .map(|s| strip_citation_markers(s))
        .collect::<Vec<_>>()
        .join(" "))
}

/// [`DatasetSource`] reading JSON exports of the benchmark datasets
pub struct JsonDatasetLoader {
    kind: DatasetKind,
    dataset_dir: PathBuf,
}

impl JsonDatasetLoader {
    pub fn new(kind: DatasetKind, dataset_dir: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            dataset_dir: dataset_dir.into(),
        }
    }

    fn dataset_root(&self) -> PathBuf {
        self.dataset_dir.join(self.kind.as_str())
    }

    fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, DatasetError> {
        if !path.exists() {
            return Err(DatasetError::NotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| DatasetError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    fn load_detective_qa(&self) -> Result<Vec<QuestionItem>, DatasetError> {
        let root = self.dataset_root();
        let anno_path = root.join("human_anno.json");
        // Novels are visited in file order; `preserve_order` keeps the map ordered.
        let annotations: serde_json::Map<String, serde_json::Value> =
            Self::read_json(&anno_path)?;
        let novels: BTreeMap<String, NovelText> = Self::read_json(&root.join("novel_data.json"))?;

        let mut items = Vec::new();
        for (key, value) in annotations {
            let novel: AnnotatedNovel =
                serde_json::from_value(value).map_err(|source| DatasetError::Parse {
                    path: anno_path.display().to_string(),
                    source,
                })?;
            let sentences = novels
                .get(&key)
                .ok_or_else(|| DatasetError::MissingField {
                    field: key.clone(),
                    context: "novel_data.json".to_string(),
                })?
                .origin_text
                .as_deref()
                .ok_or_else(|| DatasetError::MissingField {
                    field: "origin_text".to_string(),
                    context: format!("novel {}", key),
                })?;

            for question in novel.questions {
                let context = combine_before_position(
                    sentences,
                    question.answer_position,
                    &format!("novel {}", key),
                )?;
                items.push(QuestionItem::new(
                    question.question,
                    question.options,
                    question.answer,
                    context,
                ));
            }
        }
        Ok(items)
    }

    fn load_novel_qa(&self) -> Result<Vec<QuestionItem>, DatasetError> {
        let raw: Vec<NovelQaItem> = Self::read_json(&self.dataset_root().join("data.json"))?;
        Ok(raw
            .into_iter()
            .filter(|item| item.complexity.as_deref() == Some(MULTI_HOP))
            .map(|item| QuestionItem::new(item.question, item.options, item.answer, item.context))
            .collect())
    }
}

impl DatasetSource for JsonDatasetLoader {
    fn name(&self) -> &str {
        self.kind.as_str()
    }

    fn load(&self, limit: usize) -> Result<Vec<QuestionItem>, DatasetError> {
        let mut items = match self.kind {
            DatasetKind::DetectiveQa => self.load_detective_qa()?,
            DatasetKind::NovelQa => self.load_novel_qa()?,
        };
        let available = items.len();
        items.truncate(limit);
        info!(
            "Loaded {} of {} questions from {}",
            items.len(),
            available,
            self.kind
        );
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, relative: &str, content: &str) {
        let path = dir.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    fn sentences(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|s| s.to_string()).collect()
    }

    // ==================== Context Assembly Tests ====================

    #[test]
    fn test_strip_citation_markers() {
        assert_eq!(strip_citation_markers("[1] The door [23]  was open."), "The door was open.");
        assert_eq!(strip_citation_markers("no markers [x]"), "no markers [x]");
    }

    #[test]
    fn test_combine_before_position() {
        let text = sentences(&["[0] It rained.", "[1] The butler left.", "[2] A shot."]);
        assert_eq!(
            combine_before_position(&text, 2, "t").unwrap(),
            "It rained. The butler left."
        );
        assert_eq!(combine_before_position(&text, 0, "t").unwrap(), "");
        assert_eq!(
            combine_before_position(&text, 3, "t").unwrap(),
            "It rained. The butler left. A shot."
        );
    }

    #[test]
    fn test_combine_position_out_of_range() {
        let text = sentences(&["a", "b"]);
        assert!(matches!(
            combine_before_position(&text, 3, "t"),
            Err(DatasetError::PositionOutOfRange { position: 3, len: 2, .. })
        ));
        assert!(matches!(
            combine_before_position(&text, -1, "t"),
            Err(DatasetError::PositionOutOfRange { .. })
        ));
    }

    // ==================== DetectiveQA Tests ====================

    #[test]
    fn test_load_detective_qa() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "DetectiveQA/human_anno.json",
            r#"{
                "101": {"questions": [
                    {"question": "Who?", "options": {"A": "Butler", "B": "Cook"}, "answer": "A", "answer_position": 2},
                    {"question": "Where?", "options": ["Hall", "Garden"], "answer": "B", "answer_position": 1}
                ]},
                "102": {"questions": [
                    {"question": "When?", "options": ["Noon", "Night"], "answer": "B", "answer_position": 0}
                ]}
            }"#,
        );
        write(
            dir.path(),
            "DetectiveQA/novel_data.json",
            r#"{
                "101": {"origin_text": ["[0] First.", "[1] Second.", "[2] Third."]},
                "102": {"origin_text": []}
            }"#,
        );
        let loader = JsonDatasetLoader::new(DatasetKind::DetectiveQa, dir.path());

        let items = loader.load(10).unwrap();

        assert_eq!(items.len(), 3);
        assert_eq!(items[0].question, "Who?");
        assert_eq!(items[0].context, "First. Second.");
        assert_eq!(items[0].options.labels().collect::<Vec<_>>(), vec!["A", "B"]);
        assert_eq!(items[1].context, "First.");
        assert_eq!(items[2].context, "");
    }

    #[test]
    fn test_detective_qa_keeps_file_order() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "DetectiveQA/human_anno.json",
            r#"{
                "9": {"questions": [{"question": "first-in-file", "options": ["x"], "answer": "A", "answer_position": 0}]},
                "10": {"questions": [{"question": "second-in-file", "options": ["x"], "answer": "A", "answer_position": 0}]}
            }"#,
        );
        write(
            dir.path(),
            "DetectiveQA/novel_data.json",
            r#"{"10": {"origin_text": []}, "9": {"origin_text": []}}"#,
        );
        let loader = JsonDatasetLoader::new(DatasetKind::DetectiveQa, dir.path());

        let items = loader.load(1).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].question, "first-in-file");

        let all = loader.load(10).unwrap();
        assert_eq!(
            all.iter().map(|i| i.question.as_str()).collect::<Vec<_>>(),
            vec!["first-in-file", "second-in-file"]
        );
    }

    #[test]
    fn test_detective_qa_missing_origin_text() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "DetectiveQA/human_anno.json",
            r#"{"7": {"questions": [{"question": "Q", "options": ["x"], "answer": "A", "answer_position": 0}]}}"#,
        );
        write(dir.path(), "DetectiveQA/novel_data.json", r#"{"7": {}}"#);
        let loader = JsonDatasetLoader::new(DatasetKind::DetectiveQa, dir.path());

        let err = loader.load(1).unwrap_err();

        assert!(matches!(err, DatasetError::MissingField { ref field, .. } if field == "origin_text"));
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let loader = JsonDatasetLoader::new(DatasetKind::DetectiveQa, dir.path());
        assert!(matches!(loader.load(1), Err(DatasetError::NotFound(_))));
    }

    // ==================== NovelQA Tests ====================

    #[test]
    fn test_load_novel_qa_keeps_multi_hop_only() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "NovelQA/data.json",
            r#"[
                {"question": "Q1", "options": ["a", "b"], "answer": "A", "context": "c1", "complexity": "mh"},
                {"question": "Q2", "options": ["a", "b"], "answer": "B", "context": "c2", "complexity": "sh"},
                {"question": "Q3", "options": ["a", "b"], "answer": "B", "context": "c3"},
                {"question": "Q4", "options": ["a", "b"], "answer": "A", "context": "c4", "complexity": "mh"}
            ]"#,
        );
        let loader = JsonDatasetLoader::new(DatasetKind::NovelQa, dir.path());

        let all = loader.load(10).unwrap();
        assert_eq!(
            all.iter().map(|i| i.question.as_str()).collect::<Vec<_>>(),
            vec!["Q1", "Q4"]
        );

        let first = loader.load(1).unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].context, "c1");
        assert_eq!(loader.name(), "NovelQA");
    }
}
