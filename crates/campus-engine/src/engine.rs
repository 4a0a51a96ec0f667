//! One quiz flow end to end: load questions, walk the wizard, submit each
//! phase, present recommendations and keep the snapshot.
//!
//! The engine is the single owner of a session. Network calls are bounded
//! by [`EngineOptions::timeout`]. A submission can also be driven in split
//! form ([`QuizEngine::begin_submit`], [`QuizEngine::submit`],
//! [`QuizEngine::finish_submit`]); each pending submission carries a
//! generation token, and results arriving after a reset or cancel are
//! discarded.

use std::future::Future;
use std::time::Duration;

use campus_client::{ClientError, QuizBackend};
use campus_core::QuizError;
use campus_core::entities::{
    AnswerValue, DomainDescriptor, PersistedResult, Question, QuestionId, Recommendation,
};
use campus_core::enums::Phase;
use campus_core::responses::{
    ActionRequest, ActionResponse, PhaseOutcome, ResponseEntry, SearchRequest, SubmitRequest,
};
use campus_store::{ResultPersistence, SessionStore};
use serde::Serialize;

use crate::phase::{Entered, PhaseMachine};
use crate::presenter::RecommendationPresenter;
use crate::wizard::{Step, Wizard};

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Selection cap for descriptors that do not set one.
pub const DEFAULT_SELECTION_CAP: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    pub timeout: Duration,
    pub selection_cap: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            selection_cap: DEFAULT_SELECTION_CAP,
        }
    }
}

/// Where the session stands, for progress display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub index: usize,
    pub total: usize,
    pub phase: Phase,
}

/// Result of an advance or a finished submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The cursor moved within the current questions.
    Moved(usize),
    /// The phase was submitted and follow-up questions were appended.
    EnteredFollowUp { added: usize },
    /// The phase was submitted and the flow reached recommendations.
    EnteredRecommendations { count: usize },
    /// The submission result arrived for a session that moved on.
    Discarded,
}

/// A phase submission that has been started but not applied.
#[derive(Debug, Clone)]
pub struct PendingSubmit {
    generation: u64,
    phase: Phase,
    request: SubmitRequest,
}

impl PendingSubmit {
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub const fn request(&self) -> &SubmitRequest {
        &self.request
    }
}

/// Generic quiz flow over a backend `B` and a session store `S`.
pub struct QuizEngine<B, S> {
    descriptor: DomainDescriptor,
    backend: B,
    store: S,
    options: EngineOptions,
    wizard: Option<Wizard>,
    machine: PhaseMachine,
    presenter: RecommendationPresenter,
    generation: u64,
    in_flight: Option<u64>,
    last_error: Option<String>,
    saved_answers: Vec<ResponseEntry>,
}

impl<B: QuizBackend, S: SessionStore> QuizEngine<B, S> {
    pub fn new(descriptor: DomainDescriptor, backend: B, store: S, options: EngineOptions) -> Self {
        let cap = descriptor.selection_cap.unwrap_or(options.selection_cap);
        Self {
            descriptor,
            backend,
            store,
            options,
            wizard: None,
            machine: PhaseMachine::new(),
            presenter: RecommendationPresenter::new(Some(cap)),
            generation: 0,
            in_flight: None,
            last_error: None,
            saved_answers: Vec::new(),
        }
    }

    #[must_use]
    pub const fn descriptor(&self) -> &DomainDescriptor {
        &self.descriptor
    }

    #[must_use]
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.options.timeout
    }

    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.machine.phase()
    }

    /// Inline message for the most recent recoverable error, cleared by the
    /// next successful operation.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    #[must_use]
    pub const fn is_submitting(&self) -> bool {
        self.in_flight.is_some()
    }

    // ── Session lifecycle ──────────────────────────────────────────

    /// Restore a saved result and enter `recommendations` directly.
    ///
    /// Returns whether a result was restored. Missing, corrupt or
    /// incomplete snapshots leave the engine untouched.
    pub fn resume(&mut self) -> bool {
        let Some(keys) = &self.descriptor.persistence else {
            return false;
        };
        let persistence = ResultPersistence::new(keys);
        let Some(saved) = persistence.load_completed(&self.store) else {
            return false;
        };
        if !saved.completed {
            tracing::debug!(domain = %self.descriptor.name, "saved result is not completed");
            return false;
        }
        let answers = persistence.load_answers(&self.store).unwrap_or_default();

        self.clear_session();
        self.saved_answers = answers;
        self.machine = PhaseMachine::restored();
        self.presenter.set_records(saved.recommendations);
        if let Some(id) = saved.selected_id {
            if let Err(error) = self.presenter.toggle_selection(&id) {
                tracing::warn!(%error, "saved selection no longer matches a recommendation");
            }
        }
        tracing::debug!(
            domain = %self.descriptor.name,
            recommendations = self.presenter.records().len(),
            "restored saved result"
        );
        true
    }

    /// Fetch the initial questions into a fresh session.
    ///
    /// May be called again after a failure to retry.
    ///
    /// # Errors
    ///
    /// - [`QuizError::Network`] if the request fails or times out.
    /// - [`QuizError::MalformedResponse`] if the batch is empty or does not decode.
    pub async fn start(&mut self) -> Result<(), QuizError> {
        self.clear_session();
        let fetched = bounded(
            self.options.timeout,
            self.backend.fetch_initial_questions(&self.descriptor),
        )
        .await
        .and_then(Wizard::new);
        let wizard = self.record(fetched)?;
        tracing::debug!(
            domain = %self.descriptor.name,
            questions = wizard.total(),
            "quiz started"
        );
        self.wizard = Some(wizard);
        Ok(())
    }

    /// Drop the session and invalidate any in-flight submission.
    pub fn reset(&mut self) {
        self.clear_session();
        tracing::debug!(domain = %self.descriptor.name, generation = self.generation, "session reset");
    }

    /// Remove the saved snapshot for this domain.
    ///
    /// # Errors
    ///
    /// Returns [`QuizError::Other`] if the store cannot be written.
    pub fn forget_saved(&mut self) -> Result<(), QuizError> {
        let Some(keys) = &self.descriptor.persistence else {
            return Ok(());
        };
        ResultPersistence::new(keys)
            .clear(&mut self.store)
            .map_err(|e| QuizError::Other(e.into()))
    }

    fn clear_session(&mut self) {
        self.wizard = None;
        self.machine = PhaseMachine::new();
        self.presenter = RecommendationPresenter::new(self.presenter.cap());
        self.generation += 1;
        self.in_flight = None;
        self.last_error = None;
        self.saved_answers.clear();
    }

    // ── Wizard ─────────────────────────────────────────────────────

    /// Record an answer for a question of the session.
    ///
    /// # Errors
    ///
    /// See [`Wizard::record_answer`]; [`QuizError::WrongPhase`] once the
    /// flow shows recommendations or before [`start`](Self::start).
    pub fn record_answer(&mut self, id: &QuestionId, value: &str) -> Result<(), QuizError> {
        let recorded = self.wizard_mut("record_answer")?.record_answer(id, value);
        self.record(recorded)
    }

    /// Store a complete answer value.
    ///
    /// # Errors
    ///
    /// See [`Wizard::set_answer`].
    pub fn set_answer(&mut self, id: &QuestionId, value: AnswerValue) -> Result<(), QuizError> {
        let recorded = self.wizard_mut("set_answer")?.set_answer(id, value);
        self.record(recorded)
    }

    #[must_use]
    pub fn can_advance(&self) -> bool {
        !self.machine.phase().is_terminal() && self.wizard.as_ref().is_some_and(Wizard::can_advance)
    }

    pub fn retreat(&mut self) {
        if self.machine.phase().is_terminal() {
            return;
        }
        if let Some(wizard) = self.wizard.as_mut() {
            wizard.retreat();
        }
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        if self.machine.phase().is_terminal() {
            return None;
        }
        self.wizard.as_ref().and_then(Wizard::current)
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        match &self.wizard {
            Some(wizard) => wizard.questions(),
            None => &[],
        }
    }

    #[must_use]
    pub fn answer(&self, id: &QuestionId) -> Option<&AnswerValue> {
        self.wizard.as_ref().and_then(|w| w.answers().get(id))
    }

    /// Answers stored with a resumed result; empty for a live session.
    #[must_use]
    pub fn saved_answers(&self) -> &[ResponseEntry] {
        &self.saved_answers
    }

    #[must_use]
    pub fn progress(&self) -> Progress {
        Progress {
            index: self.wizard.as_ref().map_or(0, Wizard::cursor),
            total: self.wizard.as_ref().map_or(0, Wizard::total),
            phase: self.machine.phase(),
        }
    }

    /// Move to the next question, submitting the phase when its batch is
    /// exhausted.
    ///
    /// # Errors
    ///
    /// - [`QuizError::Validation`] if the current question is unanswered.
    /// - [`QuizError::SubmitInFlight`] while a split submission is pending.
    /// - Submission errors; phase and cursor are then unchanged.
    pub async fn advance(&mut self) -> Result<StepOutcome, QuizError> {
        if self.in_flight.is_some() {
            return Err(QuizError::SubmitInFlight);
        }
        let step = self.wizard_mut("advance")?.advance();
        match self.record(step)? {
            Step::Moved(index) => {
                tracing::debug!(index, "advanced");
                Ok(StepOutcome::Moved(index))
            }
            Step::BatchExhausted => {
                let pending = self.begin_submit()?;
                let result = self.submit(&pending).await;
                self.finish_submit(pending, result)
            }
        }
    }

    // ── Submission ─────────────────────────────────────────────────

    /// Build the submission for the current phase and mark it in flight.
    ///
    /// # Errors
    ///
    /// - [`QuizError::SubmitInFlight`] if another submission is pending.
    /// - [`QuizError::WrongPhase`] before start or in the terminal phase.
    /// - [`QuizError::Validation`] if a question of the batch is unanswered.
    pub fn begin_submit(&mut self) -> Result<PendingSubmit, QuizError> {
        if self.in_flight.is_some() {
            return Err(QuizError::SubmitInFlight);
        }
        let phase = self.machine.phase();
        let request = match &self.wizard {
            Some(wizard) => self.machine.submission(wizard),
            None => Err(QuizError::WrongPhase {
                operation: "submit".into(),
                phase,
            }),
        };
        let request = self.record(request)?;

        self.generation += 1;
        self.in_flight = Some(self.generation);
        tracing::debug!(
            domain = %self.descriptor.name,
            %phase,
            generation = self.generation,
            responses = request.responses.len(),
            "submitting phase"
        );
        Ok(PendingSubmit {
            generation: self.generation,
            phase,
            request,
        })
    }

    /// Send a pending submission to the backend.
    ///
    /// # Errors
    ///
    /// [`QuizError::Network`] or [`QuizError::MalformedResponse`].
    pub async fn submit(&self, pending: &PendingSubmit) -> Result<PhaseOutcome, QuizError> {
        bounded(
            self.options.timeout,
            self.backend
                .submit_phase(&self.descriptor, pending.phase, &pending.request),
        )
        .await
    }

    /// Apply the result of a pending submission.
    ///
    /// Results for a submission that was cancelled or belongs to a reset
    /// session are dropped with [`StepOutcome::Discarded`].
    ///
    /// # Errors
    ///
    /// The submission error, or a [`QuizError::MalformedResponse`] from the
    /// phase machine. Phase, cursor and answers are unchanged on error.
    pub fn finish_submit(
        &mut self,
        pending: PendingSubmit,
        result: Result<PhaseOutcome, QuizError>,
    ) -> Result<StepOutcome, QuizError> {
        if self.in_flight != Some(pending.generation) {
            tracing::warn!(
                generation = pending.generation,
                current = self.generation,
                "discarding late submission result"
            );
            return Ok(StepOutcome::Discarded);
        }
        self.in_flight = None;

        let outcome = self.record(result)?;
        let applied = match self.wizard.as_mut() {
            Some(wizard) => self
                .machine
                .apply_outcome(wizard, &self.descriptor, outcome),
            None => Err(QuizError::WrongPhase {
                operation: "submit".into(),
                phase: self.machine.phase(),
            }),
        };
        match self.record(applied)? {
            Entered::FollowUp(added) => Ok(StepOutcome::EnteredFollowUp { added }),
            Entered::Recommendations(recommendations) => {
                let count = recommendations.len();
                self.persist_completed(&recommendations);
                self.presenter.set_records(recommendations);
                Ok(StepOutcome::EnteredRecommendations { count })
            }
        }
    }

    /// Abandon the in-flight submission; its result will be discarded.
    /// Returns whether one was pending.
    pub fn cancel_pending(&mut self) -> bool {
        let cancelled = self.in_flight.take();
        if let Some(generation) = cancelled {
            tracing::debug!(generation, "cancelled pending submission");
        }
        cancelled.is_some()
    }

    fn persist_completed(&mut self, recommendations: &[Recommendation]) {
        let Some(keys) = &self.descriptor.persistence else {
            return;
        };
        let persistence = ResultPersistence::new(keys);
        let result = PersistedResult::completed_now(recommendations.to_vec());
        if let Err(error) = persistence.save_completed(&mut self.store, &result) {
            tracing::warn!(%error, "failed to save completed result");
        }
        if let Some(wizard) = &self.wizard {
            if let Err(error) = persistence.save_answers(&mut self.store, &wizard.all_responses()) {
                tracing::warn!(%error, "failed to save answers");
            }
        }
    }

    /// Rewrite the saved snapshot with the records and selection now shown.
    fn persist_shown(&mut self) {
        let Some(keys) = &self.descriptor.persistence else {
            return;
        };
        let persistence = ResultPersistence::new(keys);
        let mut result = persistence
            .load_completed(&self.store)
            .unwrap_or_else(|| PersistedResult::completed_now(Vec::new()));
        result.recommendations = self.presenter.records().to_vec();
        result.selected_id = self.presenter.selected_ids().first().cloned();
        if let Err(error) = persistence.save_completed(&mut self.store, &result) {
            tracing::warn!(%error, "failed to save search results");
        }
    }

    // ── Recommendations ────────────────────────────────────────────

    #[must_use]
    pub const fn presenter(&self) -> &RecommendationPresenter {
        &self.presenter
    }

    pub const fn presenter_mut(&mut self) -> &mut RecommendationPresenter {
        &mut self.presenter
    }

    /// Ask the backend for alternatives and merge them per the descriptor.
    /// Returns how many records are shown afterwards.
    ///
    /// # Errors
    ///
    /// - [`QuizError::WrongPhase`] before recommendations.
    /// - [`QuizError::ActionUnsupported`] if the domain has no search endpoint.
    /// - [`QuizError::Validation`] for blank text.
    /// - Request errors; the displayed list is then unchanged.
    pub async fn search(&mut self, text: &str) -> Result<usize, QuizError> {
        self.require_recommendations("search")?;
        if self.descriptor.search_path.is_none() {
            return Err(self.unsupported("search"));
        }
        let text = text.trim();
        if text.is_empty() {
            return Err(QuizError::Validation("search text required".into()));
        }
        let request = SearchRequest {
            search: text.to_string(),
            current_recommendations: self
                .presenter
                .records()
                .iter()
                .map(|r| r.id.clone())
                .collect(),
        };
        let found = bounded(
            self.options.timeout,
            self.backend.search(&self.descriptor, &request),
        )
        .await;
        let results = self.record(found)?;
        tracing::debug!(text, results = results.len(), merge = %self.descriptor.search_merge, "search");
        self.presenter
            .apply_search(results, self.descriptor.search_merge);
        self.persist_shown();
        Ok(self.presenter.records().len())
    }

    /// Toggle selection of a recommendation, keeping the domain's
    /// `selected` key in step with the first selected id.
    ///
    /// # Errors
    ///
    /// [`QuizError::WrongPhase`] before recommendations,
    /// [`QuizError::UnknownRecommendation`] for ids not shown.
    pub fn select(&mut self, id: &str) -> Result<bool, QuizError> {
        self.require_recommendations("select")?;
        let selected = self.presenter.toggle_selection(id)?;
        if let Some(keys) = &self.descriptor.persistence {
            let first = self.presenter.selected_ids().first().map(String::as_str);
            if let Err(error) = ResultPersistence::new(keys).save_selected(&mut self.store, first) {
                tracing::warn!(%error, "failed to save selection");
            }
        }
        Ok(selected)
    }

    /// Post the terminal action for the selected recommendations.
    ///
    /// # Errors
    ///
    /// - [`QuizError::ActionUnsupported`] if the domain has no action endpoint.
    /// - [`QuizError::Validation`] if nothing is selected.
    /// - [`QuizError::ActionRejected`] if the backend answers `success: false`.
    /// - Request errors.
    pub async fn commit_selection(&mut self) -> Result<ActionResponse, QuizError> {
        let action = self.descriptor.action_label.clone();
        self.require_recommendations(&action)?;
        if self.descriptor.action_path.is_none() {
            return Err(self.unsupported(&action));
        }
        if self.presenter.selected_ids().is_empty() {
            return Err(QuizError::Validation(format!(
                "select at least one recommendation to {action}"
            )));
        }
        let request = ActionRequest {
            action: action.clone(),
            recommendation_ids: self.presenter.selected_ids().to_vec(),
        };
        let sent = bounded(
            self.options.timeout,
            self.backend.commit_action(&self.descriptor, &request),
        )
        .await;
        let response = self.record(sent)?;
        if !response.success {
            let rejected = QuizError::ActionRejected { action };
            self.last_error = Some(rejected.user_message());
            return Err(rejected);
        }
        Ok(response)
    }

    // ── Helpers ────────────────────────────────────────────────────

    fn wizard_mut(&mut self, operation: &str) -> Result<&mut Wizard, QuizError> {
        let phase = self.machine.phase();
        match self.wizard.as_mut() {
            Some(wizard) if !phase.is_terminal() => Ok(wizard),
            _ => Err(QuizError::WrongPhase {
                operation: operation.to_string(),
                phase,
            }),
        }
    }

    fn require_recommendations(&self, operation: &str) -> Result<(), QuizError> {
        let phase = self.machine.phase();
        if phase.is_terminal() {
            Ok(())
        } else {
            Err(QuizError::WrongPhase {
                operation: operation.to_string(),
                phase,
            })
        }
    }

    fn unsupported(&self, operation: &str) -> QuizError {
        QuizError::ActionUnsupported {
            domain: self.descriptor.name.clone(),
            operation: operation.to_string(),
        }
    }

    /// Track the inline error message for recoverable failures.
    fn record<T>(&mut self, result: Result<T, QuizError>) -> Result<T, QuizError> {
        match result {
            Ok(value) => {
                self.last_error = None;
                Ok(value)
            }
            Err(error) => {
                if error.is_retryable() {
                    tracing::warn!(domain = %self.descriptor.name, %error, "request failed");
                } else {
                    tracing::debug!(domain = %self.descriptor.name, %error, "rejected");
                }
                if error.is_recoverable() {
                    self.last_error = Some(error.user_message());
                }
                Err(error)
            }
        }
    }
}

/// Await a backend call, turning expiry into a network error.
async fn bounded<T, F>(timeout: Duration, request: F) -> Result<T, QuizError>
where
    F: Future<Output = Result<T, ClientError>>,
{
    match tokio::time::timeout(timeout, request).await {
        Ok(result) => result.map_err(QuizError::from),
        Err(_) => Err(QuizError::Network(format!(
            "request timed out after {}s",
            timeout.as_secs()
        ))),
    }
}
