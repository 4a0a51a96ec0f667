use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A recorded answer.
///
/// Single-choice and free-text questions store one string; multi-choice
/// questions store an ordered, duplicate-free list.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(untagged)]
pub enum AnswerValue {
    Single(String),
    Multi(Vec<String>),
}

impl AnswerValue {
    /// Whether the answer satisfies the "answer required" gate.
    #[must_use]
    pub fn is_present(&self) -> bool {
        match self {
            Self::Single(value) => !value.is_empty(),
            Self::Multi(values) => !values.is_empty(),
        }
    }

    /// Toggle membership of `value` in a multi-select answer.
    ///
    /// Adds `value` when absent and removes it when present. A single value is
    /// first promoted to a one-element list.
    pub fn toggle(&mut self, value: &str) {
        if let Self::Single(existing) = self {
            let promoted = if existing.is_empty() {
                Vec::new()
            } else {
                vec![std::mem::take(existing)]
            };
            *self = Self::Multi(promoted);
        }
        if let Self::Multi(values) = self {
            if let Some(pos) = values.iter().position(|v| v == value) {
                values.remove(pos);
            } else {
                values.push(value.to_string());
            }
        }
    }

    /// All answer tokens, in order.
    #[must_use]
    pub fn values(&self) -> Vec<&str> {
        match self {
            Self::Single(value) => vec![value.as_str()],
            Self::Multi(values) => values.iter().map(String::as_str).collect(),
        }
    }
}
