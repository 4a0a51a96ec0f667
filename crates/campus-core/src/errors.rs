//! Cross-cutting error types for Campus.
//!
//! `QuizError` is what a quiz flow surfaces to its caller. Transport and
//! storage errors are defined in their own crates (`ClientError`,
//! `StoreError`) and converted at the engine boundary.

use thiserror::Error;

use crate::enums::Phase;

/// Errors raised while driving a quiz flow.
#[derive(Debug, Error)]
pub enum QuizError {
    /// The user tried to advance without a required answer.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A choice answer is not among the question's options.
    #[error("Invalid option '{value}' for question {question_id}")]
    InvalidOption { question_id: String, value: String },

    /// The answer refers to a question that is not part of the session.
    #[error("Unknown question: {0}")]
    UnknownQuestion(String),

    /// A fetch failed, timed out, or returned a non-success status.
    #[error("Network error: {0}")]
    Network(String),

    /// A response could not be parsed or lacked expected fields.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// A submission is already in flight for this session.
    #[error("A submission is already in progress")]
    SubmitInFlight,

    /// A phase transition was attempted that the state machine forbids.
    #[error("Invalid phase transition from {from} to {to}")]
    InvalidTransition { from: Phase, to: Phase },

    /// The operation is not available in the current phase.
    #[error("Operation '{operation}' is not available in phase {phase}")]
    WrongPhase { operation: String, phase: Phase },

    /// A recommendation id that is not displayed.
    #[error("Unknown recommendation: {0}")]
    UnknownRecommendation(String),

    /// The domain has no endpoint for the requested operation.
    #[error("Domain '{domain}' does not support {operation}")]
    ActionUnsupported { domain: String, operation: String },

    /// The backend answered an action with `success: false`.
    #[error("The backend rejected '{action}'")]
    ActionRejected { action: String },

    /// No descriptor is configured for the requested domain.
    #[error("Unknown domain: {0}")]
    UnknownDomain(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl QuizError {
    /// Whether the flow can continue after this error (retry, fix the answer).
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self, Self::UnknownDomain(_) | Self::Other(_))
    }

    /// Whether a "Try Again" of the same request may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::MalformedResponse(_))
    }

    /// Short inline message suitable for showing next to the quiz.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(_) => "Please answer this question before continuing.".to_string(),
            Self::InvalidOption { value, .. } => format!("'{value}' is not one of the options."),
            Self::Network(_) | Self::MalformedResponse(_) => {
                "We couldn't reach the recommendation service. Try again.".to_string()
            }
            Self::SubmitInFlight => "Still working on your answers…".to_string(),
            Self::ActionRejected { action } => format!("Could not {action} right now."),
            other => other.to_string(),
        }
    }
}
