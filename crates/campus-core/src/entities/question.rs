use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::enums::QuestionKind;

/// Identifier of a question within a session.
///
/// Initial questions come from the question set provider and carry numeric
/// ids; follow-up questions are generated by the backend and carry string ids.
/// On the wire the variant is encoded as a JSON number or string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum QuestionId {
    Initial(u32),
    FollowUp(String),
}

impl QuestionId {
    #[must_use]
    pub const fn is_follow_up(&self) -> bool {
        matches!(self, Self::FollowUp(_))
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Initial(id) => write!(f, "{id}"),
            Self::FollowUp(id) => f.write_str(id),
        }
    }
}

impl From<u32> for QuestionId {
    fn from(id: u32) -> Self {
        Self::Initial(id)
    }
}

impl From<&str> for QuestionId {
    fn from(id: &str) -> Self {
        Self::FollowUp(id.to_string())
    }
}

/// A single quiz question. Immutable once appended to a session.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Question {
    pub id: QuestionId,
    pub prompt: String,
    pub kind: QuestionKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl Question {
    pub fn single_choice(
        id: impl Into<QuestionId>,
        prompt: impl Into<String>,
        options: &[&str],
    ) -> Self {
        Self::with_options(id, prompt, QuestionKind::SingleChoice, options)
    }

    pub fn multi_choice(
        id: impl Into<QuestionId>,
        prompt: impl Into<String>,
        options: &[&str],
    ) -> Self {
        Self::with_options(id, prompt, QuestionKind::MultiChoice, options)
    }

    pub fn free_text(id: impl Into<QuestionId>, prompt: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            prompt: prompt.into(),
            kind: QuestionKind::FreeText,
            options: Vec::new(),
        }
    }

    fn with_options(
        id: impl Into<QuestionId>,
        prompt: impl Into<String>,
        kind: QuestionKind,
        options: &[&str],
    ) -> Self {
        Self {
            id: id.into(),
            prompt: prompt.into(),
            kind,
            options: options.iter().map(|o| (*o).to_string()).collect(),
        }
    }

    /// Whether `value` is an acceptable answer token for this question.
    ///
    /// Free-text questions accept anything; choice questions only their options.
    #[must_use]
    pub fn accepts(&self, value: &str) -> bool {
        !self.kind.is_choice() || self.options.iter().any(|o| o == value)
    }
}
