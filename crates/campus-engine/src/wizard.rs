//! Linear next/back navigation over a growing list of question batches.

use std::collections::HashSet;

use campus_core::QuizError;
use campus_core::entities::{AnswerValue, Question, QuestionId};
use campus_core::enums::QuestionKind;
use campus_core::responses::ResponseEntry;

use crate::answers::AnswerStore;

/// Result of a successful [`Wizard::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The cursor moved to this index.
    Moved(usize),
    /// The cursor is on the last question of the last batch; the phase is
    /// ready to be submitted.
    BatchExhausted,
}

/// Cursor, batches and answers of one quiz session. Performs no I/O.
#[derive(Debug, Clone)]
pub struct Wizard {
    questions: Vec<Question>,
    /// Exclusive end offset of each batch in `questions`.
    batch_ends: Vec<usize>,
    cursor: usize,
    answers: AnswerStore,
}

impl Wizard {
    /// Start a session from the initial batch.
    ///
    /// # Errors
    ///
    /// Returns [`QuizError::MalformedResponse`] if the batch is empty or
    /// repeats a question id.
    pub fn new(initial: Vec<Question>) -> Result<Self, QuizError> {
        let mut wizard = Self {
            questions: Vec::new(),
            batch_ends: Vec::new(),
            cursor: 0,
            answers: AnswerStore::new(),
        };
        wizard.append_batch(initial)?;
        wizard.cursor = 0;
        Ok(wizard)
    }

    /// Append a batch and move the cursor to its first question.
    ///
    /// # Errors
    ///
    /// Returns [`QuizError::MalformedResponse`] if the batch is empty or
    /// reuses an id already in the session; the wizard is left unchanged.
    pub fn append_batch(&mut self, batch: Vec<Question>) -> Result<(), QuizError> {
        if batch.is_empty() {
            return Err(QuizError::MalformedResponse(
                "question batch is empty".into(),
            ));
        }
        let mut seen: HashSet<&QuestionId> = self.questions.iter().map(|q| &q.id).collect();
        if let Some(dup) = batch.iter().find(|q| !seen.insert(&q.id)) {
            return Err(QuizError::MalformedResponse(format!(
                "question id {} appears more than once",
                dup.id
            )));
        }

        self.cursor = self.questions.len();
        self.questions.extend(batch);
        self.batch_ends.push(self.questions.len());
        tracing::debug!(
            batch = self.batch_ends.len(),
            total = self.questions.len(),
            "appended question batch"
        );
        Ok(())
    }

    /// Record a single raw value: choice and text questions overwrite,
    /// multi-choice questions toggle membership.
    ///
    /// # Errors
    ///
    /// - [`QuizError::UnknownQuestion`] if `id` is not in the session.
    /// - [`QuizError::InvalidOption`] if a choice value is not an option.
    pub fn record_answer(&mut self, id: &QuestionId, value: &str) -> Result<(), QuizError> {
        let question = self.question(id)?;
        check_option(question, value)?;
        let kind = question.kind;
        match kind {
            QuestionKind::MultiChoice => self.answers.toggle(id.clone(), value),
            QuestionKind::SingleChoice | QuestionKind::FreeText => self
                .answers
                .set(id.clone(), AnswerValue::Single(value.to_string())),
        }
        Ok(())
    }

    /// Store a complete answer value, e.g. from a scripted answer file.
    ///
    /// Multi-choice lists are de-duplicated keeping first occurrences; a
    /// single string for a multi-choice question becomes a one-item list.
    ///
    /// # Errors
    ///
    /// - [`QuizError::UnknownQuestion`] if `id` is not in the session.
    /// - [`QuizError::InvalidOption`] if any choice value is not an option.
    /// - [`QuizError::Validation`] if a list is given for a single-answer question.
    pub fn set_answer(&mut self, id: &QuestionId, value: AnswerValue) -> Result<(), QuizError> {
        let question = self.question(id)?;
        for v in value.values() {
            check_option(question, v)?;
        }
        let value = match (question.kind, value) {
            (QuestionKind::MultiChoice, value) => {
                let mut list: Vec<String> = Vec::new();
                for v in value.values() {
                    if !list.iter().any(|existing| existing == v) {
                        list.push(v.to_string());
                    }
                }
                AnswerValue::Multi(list)
            }
            (_, AnswerValue::Single(v)) => AnswerValue::Single(v),
            (_, AnswerValue::Multi(_)) => {
                return Err(QuizError::Validation(format!(
                    "question {id} takes a single answer"
                )));
            }
        };
        self.answers.set(id.clone(), value);
        Ok(())
    }

    /// Whether the question under the cursor has an answer.
    #[must_use]
    pub fn can_advance(&self) -> bool {
        self.current()
            .is_some_and(|q| self.answers.is_present(&q.id))
    }

    /// Move forward one question.
    ///
    /// # Errors
    ///
    /// Returns [`QuizError::Validation`] without moving when the current
    /// question has no answer.
    pub fn advance(&mut self) -> Result<Step, QuizError> {
        if !self.can_advance() {
            return Err(QuizError::Validation("answer required".into()));
        }
        if self.cursor + 1 >= self.questions.len() {
            return Ok(Step::BatchExhausted);
        }
        self.cursor += 1;
        Ok(Step::Moved(self.cursor))
    }

    /// Move back one question; a no-op on the first question.
    pub fn retreat(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    #[must_use]
    pub fn current(&self) -> Option<&Question> {
        self.questions.get(self.cursor)
    }

    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn batch_count(&self) -> usize {
        self.batch_ends.len()
    }

    /// Questions of the most recently appended batch.
    #[must_use]
    pub fn last_batch(&self) -> &[Question] {
        let end = self.questions.len();
        let start = match self.batch_ends.len() {
            0 | 1 => 0,
            n => self.batch_ends[n - 2],
        };
        &self.questions[start..end]
    }

    #[must_use]
    pub const fn answers(&self) -> &AnswerStore {
        &self.answers
    }

    /// Answers to the last batch, in question order.
    ///
    /// # Errors
    ///
    /// Returns [`QuizError::Validation`] naming the first question in the
    /// batch that has no answer.
    pub fn last_batch_responses(&self) -> Result<Vec<ResponseEntry>, QuizError> {
        let batch = self.last_batch();
        if let Some(missing) = batch.iter().find(|q| !self.answers.is_present(&q.id)) {
            return Err(QuizError::Validation(format!(
                "answer required for question {}",
                missing.id
            )));
        }
        Ok(self.answers.responses_for(batch))
    }

    /// Every recorded answer, in question order.
    #[must_use]
    pub fn all_responses(&self) -> Vec<ResponseEntry> {
        self.answers.responses_for(&self.questions)
    }

    fn question(&self, id: &QuestionId) -> Result<&Question, QuizError> {
        self.questions
            .iter()
            .find(|q| &q.id == id)
            .ok_or_else(|| QuizError::UnknownQuestion(id.to_string()))
    }
}

fn check_option(question: &Question, value: &str) -> Result<(), QuizError> {
    if question.accepts(value) {
        Ok(())
    } else {
        Err(QuizError::InvalidOption {
            question_id: question.id.to_string(),
            value: value.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn wizard() -> Wizard {
        Wizard::new(vec![
            Question::single_choice(1, "Budget?", &["Low", "High"]),
            Question::multi_choice(2, "Amenities?", &["Gym", "Library"]),
            Question::free_text(3, "Anything else?"),
        ])
        .unwrap()
    }

    #[test]
    fn advance_requires_answer_and_leaves_state_unchanged() {
        let mut w = wizard();
        let err = w.advance().unwrap_err();
        assert!(matches!(err, QuizError::Validation(_)));
        assert_eq!(w.cursor(), 0);
        assert!(w.answers().is_empty());
    }

    #[test]
    fn invalid_option_is_rejected_without_change() {
        let mut w = wizard();
        let err = w.record_answer(&QuestionId::Initial(1), "Medium").unwrap_err();
        assert!(matches!(err, QuizError::InvalidOption { .. }));
        assert!(w.answers().get(&QuestionId::Initial(1)).is_none());
    }

    #[test]
    fn unknown_question_is_rejected() {
        let mut w = wizard();
        let err = w.record_answer(&QuestionId::from("f9"), "x").unwrap_err();
        assert!(matches!(err, QuizError::UnknownQuestion(_)));
    }

    #[test]
    fn last_question_reports_exhausted_batch() {
        let mut w = wizard();
        w.record_answer(&QuestionId::Initial(1), "Low").unwrap();
        assert_eq!(w.advance().unwrap(), Step::Moved(1));
        w.record_answer(&QuestionId::Initial(2), "Gym").unwrap();
        assert_eq!(w.advance().unwrap(), Step::Moved(2));
        w.record_answer(&QuestionId::Initial(3), "Near the gym").unwrap();
        assert_eq!(w.advance().unwrap(), Step::BatchExhausted);
        assert_eq!(w.cursor(), 2);
    }

    #[test]
    fn retreat_on_first_question_is_noop() {
        let mut w = wizard();
        w.retreat();
        assert_eq!(w.cursor(), 0);
    }

    #[test]
    fn append_batch_moves_cursor_to_first_new_question() {
        let mut w = wizard();
        w.append_batch(vec![Question::free_text("f1", "Why?")])
            .unwrap();
        assert_eq!(w.cursor(), 3);
        assert_eq!(w.total(), 4);
        assert_eq!(w.batch_count(), 2);
        assert_eq!(w.last_batch().len(), 1);
    }

    #[test]
    fn duplicate_or_empty_batches_are_malformed() {
        let mut w = wizard();
        assert!(w.append_batch(Vec::new()).is_err());
        assert!(
            w.append_batch(vec![Question::free_text(2, "Again?")])
                .is_err()
        );
        assert_eq!(w.total(), 3);
        assert_eq!(w.cursor(), 0);
    }

    #[test]
    fn set_answer_normalizes_multi_lists() {
        let mut w = wizard();
        w.set_answer(
            &QuestionId::Initial(2),
            AnswerValue::Multi(vec!["Gym".into(), "Library".into(), "Gym".into()]),
        )
        .unwrap();
        assert_eq!(
            w.answers().get(&QuestionId::Initial(2)),
            Some(&AnswerValue::Multi(vec!["Gym".into(), "Library".into()]))
        );

        w.set_answer(&QuestionId::Initial(2), AnswerValue::Single("Gym".into()))
            .unwrap();
        assert_eq!(
            w.answers().get(&QuestionId::Initial(2)),
            Some(&AnswerValue::Multi(vec!["Gym".into()]))
        );

        let err = w
            .set_answer(&QuestionId::Initial(1), AnswerValue::Multi(vec!["Low".into()]))
            .unwrap_err();
        assert!(matches!(err, QuizError::Validation(_)));
    }

    #[test]
    fn last_batch_responses_require_every_answer() {
        let mut w = wizard();
        w.record_answer(&QuestionId::Initial(1), "High").unwrap();
        assert!(w.last_batch_responses().is_err());
        w.record_answer(&QuestionId::Initial(2), "Gym").unwrap();
        w.record_answer(&QuestionId::Initial(3), "nope").unwrap();
        assert_eq!(w.last_batch_responses().unwrap().len(), 3);
    }
}
