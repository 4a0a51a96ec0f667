//! Completed-result snapshots under a domain's fixed key names.
//!
//! Layout for [`PersistenceKeys`]:
//! - `results`: the whole [`PersistedResult`] as JSON
//! - `completed` (optional): `"true"` / `"false"`, mirrored for readers
//!   that only check the flag; on load it overrides `completed` inside
//!   the snapshot
//! - `selected` (optional): the chosen recommendation id, updated on every
//!   selection change and preferred over the id inside the snapshot
//! - `answers` (optional): the submitted answers as a JSON array
//!
//! Reads never fail. A missing or unparseable snapshot is logged and read
//! as "no saved result", so the flow simply runs the quiz again.

use campus_core::entities::{PersistedResult, PersistenceKeys};
use campus_core::responses::ResponseEntry;

use crate::{SessionStore, StoreError};

/// Reads and writes one domain's snapshot.
#[derive(Debug, Clone, Copy)]
pub struct ResultPersistence<'k> {
    keys: &'k PersistenceKeys,
}

impl<'k> ResultPersistence<'k> {
    #[must_use]
    pub const fn new(keys: &'k PersistenceKeys) -> Self {
        Self { keys }
    }

    #[must_use]
    pub const fn keys(&self) -> &'k PersistenceKeys {
        self.keys
    }

    /// Write a completed result under every configured key.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the snapshot cannot be serialized or
    /// written.
    pub fn save_completed<S: SessionStore + ?Sized>(
        &self,
        store: &mut S,
        result: &PersistedResult,
    ) -> Result<(), StoreError> {
        store.set(&self.keys.results, &serde_json::to_string(result)?)?;
        if let Some(key) = &self.keys.completed {
            store.set(key, if result.completed { "true" } else { "false" })?;
        }
        self.save_selected(store, result.selected_id.as_deref())?;
        tracing::debug!(
            key = %self.keys.results,
            recommendations = result.recommendations.len(),
            "saved completed result"
        );
        Ok(())
    }

    /// Read the saved result back, or `None` when there is nothing usable.
    pub fn load_completed<S: SessionStore + ?Sized>(&self, store: &S) -> Option<PersistedResult> {
        let flag = match &self.keys.completed {
            Some(key) => match read(store, key)?.trim() {
                "true" => Some(true),
                "false" => Some(false),
                other => {
                    tracing::warn!(key = %key, value = other, "discarding unreadable completion flag");
                    return None;
                }
            },
            None => None,
        };

        let raw = read(store, &self.keys.results)?;
        let mut result: PersistedResult = match serde_json::from_str(&raw) {
            Ok(result) => result,
            Err(error) => {
                tracing::warn!(key = %self.keys.results, %error, "discarding corrupt saved result");
                return None;
            }
        };
        if let Some(completed) = flag {
            result.completed = completed;
        }

        if let Some(key) = &self.keys.selected {
            if let Some(selected) = read(store, key) {
                let selected = selected.trim();
                if !selected.is_empty() {
                    result.selected_id = Some(selected.to_string());
                }
            }
        }
        Some(result)
    }

    /// Record the chosen recommendation, or forget it when `None`.
    ///
    /// A no-op when the domain has no `selected` key.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store cannot be written.
    pub fn save_selected<S: SessionStore + ?Sized>(
        &self,
        store: &mut S,
        selected_id: Option<&str>,
    ) -> Result<(), StoreError> {
        let Some(key) = &self.keys.selected else {
            return Ok(());
        };
        match selected_id {
            Some(id) => store.set(key, id),
            None => store.clear(key),
        }
    }

    /// Persist submitted answers. A no-op when the domain has no `answers` key.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the answers cannot be serialized or written.
    pub fn save_answers<S: SessionStore + ?Sized>(
        &self,
        store: &mut S,
        answers: &[ResponseEntry],
    ) -> Result<(), StoreError> {
        let Some(key) = &self.keys.answers else {
            return Ok(());
        };
        store.set(key, &serde_json::to_string(answers)?)
    }

    /// Saved answers, or `None` when absent or unreadable.
    pub fn load_answers<S: SessionStore + ?Sized>(&self, store: &S) -> Option<Vec<ResponseEntry>> {
        let key = self.keys.answers.as_ref()?;
        let raw = read(store, key)?;
        match serde_json::from_str(&raw) {
            Ok(answers) => Some(answers),
            Err(error) => {
                tracing::warn!(key = %key, %error, "discarding corrupt saved answers");
                None
            }
        }
    }

    /// Remove every key of the domain.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on the first key that cannot be removed.
    pub fn clear<S: SessionStore + ?Sized>(&self, store: &mut S) -> Result<(), StoreError> {
        for key in self.keys.all() {
            store.clear(key)?;
        }
        Ok(())
    }
}

fn read<S: SessionStore + ?Sized>(store: &S, key: &str) -> Option<String> {
    match store.get(key) {
        Ok(value) => value,
        Err(error) => {
            tracing::warn!(key, %error, "failed to read session key");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;
    use campus_core::entities::{AnswerValue, QuestionId, Recommendation};
    use pretty_assertions::assert_eq;

    fn onboarding_keys() -> PersistenceKeys {
        PersistenceKeys {
            completed: Some("quizCompleted".into()),
            results: "freshmanFlowResults".into(),
            selected: None,
            answers: None,
        }
    }

    fn result() -> PersistedResult {
        PersistedResult {
            recommendations: vec![Recommendation::new("hub-housing", "Housing Office", 80.0)],
            selected_id: None,
            completed: true,
            completed_at: None,
        }
    }

    #[test]
    fn save_writes_flag_and_results() {
        let keys = onboarding_keys();
        let persistence = ResultPersistence::new(&keys);
        let mut store = MemoryStore::new();

        persistence.save_completed(&mut store, &result()).unwrap();

        assert_eq!(store.get("quizCompleted").unwrap().as_deref(), Some("true"));
        assert_eq!(persistence.load_completed(&store), Some(result()));
    }

    #[test]
    fn missing_completion_flag_means_no_result() {
        let keys = onboarding_keys();
        let persistence = ResultPersistence::new(&keys);
        let mut store = MemoryStore::new();
        persistence.save_completed(&mut store, &result()).unwrap();

        store.clear("quizCompleted").unwrap();
        assert_eq!(persistence.load_completed(&store), None);
    }

    #[test]
    fn completion_flag_overrides_snapshot() {
        let keys = onboarding_keys();
        let persistence = ResultPersistence::new(&keys);
        let mut store = MemoryStore::new();
        persistence.save_completed(&mut store, &result()).unwrap();

        store.set("quizCompleted", "false").unwrap();
        let loaded = persistence.load_completed(&store).unwrap();
        assert!(!loaded.completed);
    }

    #[test]
    fn selected_key_overrides_snapshot() {
        let keys = PersistenceKeys {
            completed: None,
            results: "dormRecommendations".into(),
            selected: Some("selectedDorm".into()),
            answers: None,
        };
        let persistence = ResultPersistence::new(&keys);
        let mut store = MemoryStore::new();
        persistence.save_completed(&mut store, &result()).unwrap();
        assert!(store.get("selectedDorm").unwrap().is_none());

        persistence
            .save_selected(&mut store, Some("hub-housing"))
            .unwrap();
        let loaded = persistence.load_completed(&store).unwrap();
        assert_eq!(loaded.selected_id.as_deref(), Some("hub-housing"));
    }

    #[test]
    fn answers_round_trip_with_tagged_ids() {
        let keys = PersistenceKeys {
            completed: None,
            results: "roommateQuizShortlist".into(),
            selected: None,
            answers: Some("roommateQuizAnswers".into()),
        };
        let persistence = ResultPersistence::new(&keys);
        let mut store = MemoryStore::new();
        let answers = vec![
            ResponseEntry {
                question_id: QuestionId::Initial(1),
                answer: AnswerValue::Single("Early".into()),
            },
            ResponseEntry {
                question_id: QuestionId::FollowUp("f2".into()),
                answer: AnswerValue::Multi(vec!["music".into()]),
            },
        ];

        persistence.save_answers(&mut store, &answers).unwrap();
        assert_eq!(persistence.load_answers(&store), Some(answers));

        store.set("roommateQuizAnswers", "{not json").unwrap();
        assert_eq!(persistence.load_answers(&store), None);
    }

    #[test]
    fn clear_removes_every_key() {
        let keys = PersistenceKeys {
            completed: Some("quizCompleted".into()),
            results: "freshmanFlowResults".into(),
            selected: Some("selected".into()),
            answers: Some("answers".into()),
        };
        let persistence = ResultPersistence::new(&keys);
        let mut store = MemoryStore::new();
        let mut saved = result();
        saved.selected_id = Some("hub-housing".into());
        persistence.save_completed(&mut store, &saved).unwrap();
        persistence.save_answers(&mut store, &[]).unwrap();

        persistence.clear(&mut store).unwrap();
        assert!(store.is_empty());
    }
}
