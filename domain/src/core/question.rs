//! Question items fed to the council

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// One labeled answer choice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub label: String,
    pub text: String,
}

/// The answer choices of a multiple-choice question (Value Object)
///
/// Datasets ship options either as a `{"A": "...", "B": "..."}` map or as a
/// plain list; lists are labeled `A`, `B`, `C`... in order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OptionSet(Vec<AnswerOption>);

impl OptionSet {
    pub fn new(options: Vec<AnswerOption>) -> Self {
        Self(options)
    }

    /// Build from unlabeled choices, assigning letters in order
    pub fn from_list<I, S>(choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(
            choices
                .into_iter()
                .enumerate()
                .map(|(i, text)| AnswerOption {
                    label: option_label(i),
                    text: text.into(),
                })
                .collect(),
        )
    }

    pub fn options(&self) -> &[AnswerOption] {
        &self.0
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|o| o.label.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn option_label(index: usize) -> String {
    match u8::try_from(index) {
        Ok(i) if i < 26 => char::from(b'A' + i).to_string(),
        _ => (index + 1).to_string(),
    }
}

impl std::fmt::Display for OptionSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, option) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}. {}", option.label, option.text)?;
        }
        Ok(())
    }
}

impl<'de> Deserialize<'de> for OptionSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Labeled(BTreeMap<String, String>),
            List(Vec<String>),
            Options(Vec<AnswerOption>),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Labeled(map) => OptionSet(
                map.into_iter()
                    .map(|(label, text)| AnswerOption { label, text })
                    .collect(),
            ),
            Raw::List(list) => OptionSet::from_list(list),
            Raw::Options(options) => OptionSet(options),
        })
    }
}

/// A single benchmark question (Entity)
///
/// `answer` is the ground-truth label. It is only used to score the run
/// afterwards and never reaches a prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionItem {
    pub question: String,
    pub options: OptionSet,
    pub answer: String,
    pub context: String,
}

impl QuestionItem {
    pub fn new(
        question: impl Into<String>,
        options: OptionSet,
        answer: impl Into<String>,
        context: impl Into<String>,
    ) -> Self {
        Self {
            question: question.into(),
            options,
            answer: answer.into(),
            context: context.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_set_from_list_labels_letters() {
        let options = OptionSet::from_list(["Butler", "Gardener", "Cook"]);
        let labels: Vec<_> = options.labels().collect();
        assert_eq!(labels, vec!["A", "B", "C"]);
        assert_eq!(options.to_string(), "A. Butler\nB. Gardener\nC. Cook");
    }

    #[test]
    fn test_option_set_deserialize_map() {
        let options: OptionSet =
            serde_json::from_str(r#"{"B": "Gardener", "A": "Butler"}"#).unwrap();
        assert_eq!(options.len(), 2);
        assert_eq!(options.options()[0].label, "A");
        assert_eq!(options.options()[1].text, "Gardener");
    }

    #[test]
    fn test_option_set_deserialize_list() {
        let options: OptionSet = serde_json::from_str(r#"["yes", "no"]"#).unwrap();
        assert_eq!(options.to_string(), "A. yes\nB. no");
    }

    #[test]
    fn test_question_item_deserialize() {
        let item: QuestionItem = serde_json::from_str(
            r#"{"question": "Who did it?", "options": ["Butler", "Cook"], "answer": "A", "context": "..."}"#,
        )
        .unwrap();
        assert_eq!(item.question, "Who did it?");
        assert_eq!(item.answer, "A");
        assert_eq!(item.options.len(), 2);
    }
}
