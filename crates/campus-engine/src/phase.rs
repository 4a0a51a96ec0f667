//! Forward-only phase transitions driven by submission outcomes.

use campus_core::QuizError;
use campus_core::entities::{DomainDescriptor, Recommendation};
use campus_core::enums::Phase;
use campus_core::responses::{PhaseOutcome, SubmitRequest};

use crate::wizard::Wizard;

/// What a successfully applied submission did to the session.
#[derive(Debug, Clone, PartialEq)]
pub enum Entered {
    /// Follow-up questions were appended; holds how many.
    FollowUp(usize),
    /// The flow reached its terminal phase with these records.
    Recommendations(Vec<Recommendation>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseMachine {
    phase: Phase,
}

impl Default for PhaseMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl PhaseMachine {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phase: Phase::Initial,
        }
    }

    /// A machine already in the terminal phase, for restored sessions.
    #[must_use]
    pub const fn restored() -> Self {
        Self {
            phase: Phase::Recommendations,
        }
    }

    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Move to `next`.
    ///
    /// # Errors
    ///
    /// Returns [`QuizError::InvalidTransition`] unless `next` is one of
    /// [`Phase::allowed_next_states`].
    pub fn transition(&mut self, next: Phase) -> Result<(), QuizError> {
        if !self.phase.can_transition_to(next) {
            return Err(QuizError::InvalidTransition {
                from: self.phase,
                to: next,
            });
        }
        tracing::debug!(from = %self.phase, to = %next, "phase transition");
        self.phase = next;
        Ok(())
    }

    /// Body for submitting the current phase: the answers to its own batch,
    /// in question order.
    ///
    /// # Errors
    ///
    /// - [`QuizError::WrongPhase`] in the terminal phase.
    /// - [`QuizError::Validation`] if a question in the batch is unanswered.
    pub fn submission(&self, wizard: &Wizard) -> Result<SubmitRequest, QuizError> {
        if self.phase.is_terminal() {
            return Err(QuizError::WrongPhase {
                operation: "submit".into(),
                phase: self.phase,
            });
        }
        Ok(SubmitRequest {
            responses: wizard.last_batch_responses()?,
        })
    }

    /// Apply a decoded submission outcome.
    ///
    /// On error neither the phase nor the wizard changes.
    ///
    /// # Errors
    ///
    /// - [`QuizError::MalformedResponse`] for follow-up questions where
    ///   recommendations are required (after the follow-up phase, or for a
    ///   flow without a follow-up step) and for an empty follow-up batch.
    /// - [`QuizError::WrongPhase`] in the terminal phase.
    pub fn apply_outcome(
        &mut self,
        wizard: &mut Wizard,
        descriptor: &DomainDescriptor,
        outcome: PhaseOutcome,
    ) -> Result<Entered, QuizError> {
        match (self.phase, outcome) {
            (Phase::Recommendations, _) => Err(QuizError::WrongPhase {
                operation: "submit".into(),
                phase: self.phase,
            }),
            (Phase::Initial, PhaseOutcome::FollowUp(questions)) if descriptor.has_follow_up() => {
                let added = questions.len();
                wizard.append_batch(questions)?;
                self.transition(Phase::FollowUp)?;
                Ok(Entered::FollowUp(added))
            }
            (_, PhaseOutcome::FollowUp(_)) => Err(QuizError::MalformedResponse(format!(
                "expected recommendations after the {} phase, got follow-up questions",
                self.phase
            ))),
            (_, PhaseOutcome::Recommendations(recommendations)) => {
                self.transition(Phase::Recommendations)?;
                Ok(Entered::Recommendations(recommendations))
            }
        }
    }
}
