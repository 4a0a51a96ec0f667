use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::SearchMerge;

/// Placeholder substituted with the URL-encoded domain name in paths.
pub const DOMAIN_PLACEHOLDER: &str = "{domain}";

/// Storage key names used to persist a completed flow.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct PersistenceKeys {
    /// Key holding the "quiz completed" flag.
    #[serde(default)]
    pub completed: Option<String>,
    /// Key holding the recommendation list.
    pub results: String,
    /// Key holding the selected recommendation id.
    #[serde(default)]
    pub selected: Option<String>,
    /// Key holding the submitted answers.
    #[serde(default)]
    pub answers: Option<String>,
}

impl PersistenceKeys {
    /// Every key name, in a stable order.
    #[must_use]
    pub fn all(&self) -> Vec<&str> {
        let mut keys = vec![self.results.as_str()];
        keys.extend(self.completed.as_deref());
        keys.extend(self.selected.as_deref());
        keys.extend(self.answers.as_deref());
        keys
    }
}

/// Declarative configuration of one recommendation flow.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct DomainDescriptor {
    pub name: String,
    #[serde(default)]
    pub title: String,
    /// GET path returning the initial questions.
    #[serde(default = "default_questions_path")]
    pub questions_path: String,
    /// POST path receiving the initial answers.
    #[serde(default = "default_questions_path")]
    pub submit_path: String,
    /// POST path receiving follow-up answers. `None` means a two-phase flow.
    #[serde(default)]
    pub follow_up_path: Option<String>,
    #[serde(default)]
    pub search_path: Option<String>,
    #[serde(default)]
    pub action_path: Option<String>,
    /// Verb shown for the terminal action (enroll, apply, join).
    #[serde(default = "default_action_label")]
    pub action_label: String,
    #[serde(default)]
    pub selection_cap: Option<usize>,
    #[serde(default)]
    pub search_merge: SearchMerge,
    #[serde(default)]
    pub persistence: Option<PersistenceKeys>,
}

fn default_questions_path() -> String {
    "/api/modules/{domain}".to_string()
}

fn default_action_label() -> String {
    "select".to_string()
}

impl DomainDescriptor {
    /// A three-phase descriptor using the conventional module paths.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: String::new(),
            questions_path: default_questions_path(),
            submit_path: default_questions_path(),
            follow_up_path: Some("/api/modules/{domain}/ai-questions".to_string()),
            search_path: None,
            action_path: None,
            action_label: default_action_label(),
            selection_cap: None,
            search_merge: SearchMerge::Replace,
            persistence: None,
        }
    }

    /// Whether the flow has a follow-up phase.
    #[must_use]
    pub const fn has_follow_up(&self) -> bool {
        self.follow_up_path.is_some()
    }

    /// Substitute `{domain}` in a path pattern with the given encoded name.
    #[must_use]
    pub fn expand_path(pattern: &str, encoded_domain: &str) -> String {
        pattern.replace(DOMAIN_PLACEHOLDER, encoded_domain)
    }
}
