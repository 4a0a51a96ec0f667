//! Per-session answer storage.

use std::collections::HashMap;

use campus_core::entities::{AnswerValue, Question, QuestionId};
use campus_core::responses::ResponseEntry;

/// Answers keyed by question id. Entries are added or overwritten, never
/// removed, for the lifetime of a session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerStore {
    entries: HashMap<QuestionId, AnswerValue>,
}

impl AnswerStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, id: &QuestionId) -> Option<&AnswerValue> {
        self.entries.get(id)
    }

    /// Replace the stored answer.
    pub fn set(&mut self, id: QuestionId, value: AnswerValue) {
        self.entries.insert(id, value);
    }

    /// Toggle membership of `value` in a multi-select answer, creating the
    /// list on first use.
    pub fn toggle(&mut self, id: QuestionId, value: &str) {
        self.entries
            .entry(id)
            .or_insert_with(|| AnswerValue::Multi(Vec::new()))
            .toggle(value);
    }

    /// Whether the answer for `id` counts as given.
    #[must_use]
    pub fn is_present(&self, id: &QuestionId) -> bool {
        self.entries.get(id).is_some_and(AnswerValue::is_present)
    }

    /// Answers to `questions` in question order, skipping unanswered ones.
    #[must_use]
    pub fn responses_for(&self, questions: &[Question]) -> Vec<ResponseEntry> {
        questions
            .iter()
            .filter_map(|q| {
                self.entries.get(&q.id).map(|answer| ResponseEntry {
                    question_id: q.id.clone(),
                    answer: answer.clone(),
                })
            })
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
