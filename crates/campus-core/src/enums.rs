//! Phase, question kind, and presentation enums for Campus.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.
//! `Phase` carries the quiz state machine and provides `allowed_next_states()`
//! to enforce forward-only transitions at the engine layer.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// Phase of a quiz session.
///
/// ```text
/// initial → follow_up → recommendations
///         → recommendations            (two-phase flows)
/// ```
///
/// Only a full session reset returns to `initial`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Initial,
    FollowUp,
    Recommendations,
}

impl Phase {
    /// Valid next states from the current state.
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Initial => &[Self::FollowUp, Self::Recommendations],
            Self::FollowUp => &[Self::Recommendations],
            Self::Recommendations => &[],
        }
    }

    /// Check whether transitioning to `next` is allowed.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    /// Whether this is the terminal phase.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Recommendations)
    }

    /// Position in the phase sequence, used to check monotonicity.
    #[must_use]
    pub const fn ordinal(self) -> u8 {
        match self {
            Self::Initial => 0,
            Self::FollowUp => 1,
            Self::Recommendations => 2,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Initial => "initial",
            Self::FollowUp => "follow_up",
            Self::Recommendations => "recommendations",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// QuestionKind
// ---------------------------------------------------------------------------

/// Input kind of a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    #[serde(alias = "single", alias = "radio")]
    SingleChoice,
    #[serde(alias = "multiple", alias = "multi", alias = "checkbox")]
    MultiChoice,
    #[serde(alias = "text")]
    FreeText,
}

impl QuestionKind {
    /// Whether answers must come from the question's option list.
    #[must_use]
    pub const fn is_choice(self) -> bool {
        matches!(self, Self::SingleChoice | Self::MultiChoice)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SingleChoice => "single_choice",
            Self::MultiChoice => "multi_choice",
            Self::FreeText => "free_text",
        }
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// SearchMerge
// ---------------------------------------------------------------------------

/// How search results are merged into the displayed recommendations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SearchMerge {
    /// Search results replace the displayed set.
    #[default]
    Replace,
    /// Search results not already displayed are appended after it.
    Append,
}

impl SearchMerge {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Replace => "replace",
            Self::Append => "append",
        }
    }
}

impl fmt::Display for SearchMerge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// SortKey
// ---------------------------------------------------------------------------

/// Sort order for presenting recommendations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Score, highest first.
    Score,
    /// Title, case-insensitive ascending.
    Title,
    /// A domain-specific extra field (e.g. `price`), ascending; missing last.
    Field(String),
}

impl SortKey {
    /// Parse a sort key from CLI input (`score`, `title`, or any field name).
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "score" => Self::Score,
            "title" | "name" => Self::Title,
            _ => Self::Field(raw.trim().to_string()),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Score => f.write_str("score"),
            Self::Title => f.write_str("title"),
            Self::Field(name) => f.write_str(name),
        }
    }
}
