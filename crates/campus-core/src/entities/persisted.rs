use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::Recommendation;

/// Snapshot of a completed flow, read back verbatim on the next visit.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct PersistedResult {
    pub recommendations: Vec<Recommendation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_id: Option<String>,
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl PersistedResult {
    /// A completed result stamped with the current time.
    #[must_use]
    pub fn completed_now(recommendations: Vec<Recommendation>) -> Self {
        Self {
            recommendations,
            selected_id: None,
            completed: true,
            completed_at: Some(Utc::now()),
        }
    }
}
