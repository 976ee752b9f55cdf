//! Structured-result parsing for council replies.
//!
//! Endpoints are asked for a JSON object but regularly wrap it in prose or a
//! markdown fence. These functions pull the object out and map it onto the
//! reply type each round expects. They are pure domain logic with no I/O.
//!
//! | Round | Reply type | Fields |
//! |-------|------------|--------|
//! | confirm | [`ConfirmReply`] | `evidence`, `answer` |
//! | exchange | [`ExchangeReply`] | `id`, `explanation` |
//! | refine | [`RefineReply`] | `utility`, `fact`, `conclusion` |
//! | decide / tie-break | [`FinalReply`] | `result` |

use crate::agent::value_objects::{Decision, Opinion, Utility};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use thiserror::Error;

/// Errors raised while reading a structured reply
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("No JSON object found in response")]
    NoJsonObject,

    #[error("Malformed reply: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Missing field: {0}")]
    MissingField(&'static str),
}

/// Locate and decode the JSON object in a free-form reply.
///
/// Tries the whole (trimmed) text first, then the span between the first
/// `{` and the last `}`.
pub fn extract_json_object(raw: &str) -> Result<serde_json::Value, ParseError> {
    let trimmed = raw.trim();
    if let Ok(value @ serde_json::Value::Object(_)) =
        serde_json::from_str::<serde_json::Value>(trimmed)
    {
        return Ok(value);
    }

    let start = trimmed.find('{').ok_or(ParseError::NoJsonObject)?;
    let end = trimmed.rfind('}').ok_or(ParseError::NoJsonObject)?;
    if end < start {
        return Err(ParseError::NoJsonObject);
    }
    match serde_json::from_str::<serde_json::Value>(&trimmed[start..=end])? {
        value @ serde_json::Value::Object(_) => Ok(value),
        _ => Err(ParseError::NoJsonObject),
    }
}

/// Decode a reply into `T`
pub fn parse_structured<T: DeserializeOwned>(raw: &str) -> Result<T, ParseError> {
    let value = extract_json_object(raw)?;
    Ok(serde_json::from_value(value)?)
}

/// Every run of ASCII digits in `text`, in order of appearance.
///
/// ```
/// use docquorum_domain::quorum::extract_ids;
///
/// assert_eq!(extract_ids("Agent 2 and agent 14"), vec![2, 14]);
/// assert_eq!(extract_ids("[0, 3]"), vec![0, 3]);
/// assert!(extract_ids("nobody").is_empty());
/// ```
pub fn extract_ids(text: &str) -> Vec<usize> {
    text.split(|c: char| !c.is_ascii_digit())
        .filter(|run| !run.is_empty())
        .filter_map(|run| run.parse().ok())
        .collect()
}

/// Accept any JSON value as text; models sometimes answer with lists or numbers.
fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(value_to_text(&serde_json::Value::deserialize(deserializer)?))
}

fn lenient_optional_text<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Null => None,
        other => Some(value_to_text(&other)),
    })
}

fn value_to_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Round 1: hypothesis from the agent's own chunk
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConfirmReply {
    #[serde(deserialize_with = "lenient_text")]
    pub evidence: String,
    #[serde(deserialize_with = "lenient_text")]
    pub answer: String,
}

impl From<ConfirmReply> for Opinion {
    fn from(reply: ConfirmReply) -> Self {
        Opinion::new(reply.evidence, reply.answer)
    }
}

/// Round 2: which peers to follow up on
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExchangeReply {
    #[serde(deserialize_with = "lenient_text")]
    pub id: String,
    #[serde(deserialize_with = "lenient_text")]
    pub explanation: String,
}

impl ExchangeReply {
    pub fn peer_ids(&self) -> Vec<usize> {
        extract_ids(&self.id)
    }
}

/// Round 3: verdict on one peer chunk
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RefineReply {
    #[serde(deserialize_with = "lenient_text")]
    pub utility: String,
    #[serde(default, deserialize_with = "lenient_optional_text")]
    pub fact: Option<String>,
    #[serde(default, deserialize_with = "lenient_optional_text")]
    pub conclusion: Option<String>,
}

/// Interpreted round-3 reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefineVerdict {
    Useless,
    Useful(Opinion),
}

impl RefineVerdict {
    pub fn utility(&self) -> Utility {
        match self {
            RefineVerdict::Useless => Utility::Useless,
            RefineVerdict::Useful(_) => Utility::Useful,
        }
    }
}

impl TryFrom<RefineReply> for RefineVerdict {
    type Error = ParseError;

    /// A useful verdict must carry both the updated fact and conclusion.
    fn try_from(reply: RefineReply) -> Result<Self, Self::Error> {
        match Utility::from_reply(&reply.utility) {
            Utility::Useless => Ok(RefineVerdict::Useless),
            Utility::Useful => {
                let fact = reply.fact.ok_or(ParseError::MissingField("fact"))?;
                let conclusion = reply
                    .conclusion
                    .ok_or(ParseError::MissingField("conclusion"))?;
                Ok(RefineVerdict::Useful(Opinion::new(fact, conclusion)))
            }
        }
    }
}

/// Parse a round-3 reply straight into a verdict
pub fn parse_refine_verdict(raw: &str) -> Result<RefineVerdict, ParseError> {
    parse_structured::<RefineReply>(raw)?.try_into()
}

/// Final round and tie-break: the chosen answer
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FinalReply {
    #[serde(deserialize_with = "lenient_text")]
    pub result: String,
}

impl FinalReply {
    pub fn decision(&self) -> Decision {
        Decision::from_reply(&self.result)
    }
}
