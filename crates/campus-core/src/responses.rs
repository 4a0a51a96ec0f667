//! JSON wire contract spoken with the recommendation backend.
//!
//! Request bodies are sent as-is. Question payloads arrive as [`RawQuestion`]
//! and are decoded into tagged [`Question`]s by their batch origin: initial
//! batches must carry numeric ids, follow-up ids are always strings.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::entities::{AnswerValue, Question, QuestionId, Recommendation};
use crate::enums::QuestionKind;

/// A response payload that does not match the contract.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct DecodeError(pub String);

/// One answered question, as submitted to the backend.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ResponseEntry {
    pub question_id: QuestionId,
    pub answer: AnswerValue,
}

/// Body of a phase submission.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SubmitRequest {
    pub responses: Vec<ResponseEntry>,
}

/// Body of a "search alternatives" request.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SearchRequest {
    pub search: String,
    pub current_recommendations: Vec<String>,
}

/// Body of a terminal action (enroll, apply, join).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ActionRequest {
    pub action: String,
    pub recommendation_ids: Vec<String>,
}

/// Backend reply to an action.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ActionResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// A question exactly as the backend sends it.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct RawQuestion {
    pub id: Value,
    #[serde(alias = "question", alias = "text")]
    pub prompt: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<QuestionKind>,
    #[serde(default)]
    pub options: Vec<String>,
}

impl RawQuestion {
    /// Decode as a question from the initial batch (numeric id).
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] when the id is not a non-negative integer or
    /// a choice question has no options.
    pub fn into_initial(self) -> Result<Question, DecodeError> {
        let id = match &self.id {
            Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
            Value::String(s) => s.trim().parse::<u32>().ok(),
            _ => None,
        }
        .ok_or_else(|| DecodeError(format!("initial question id {} is not an integer", self.id)))?;
        self.finish(QuestionId::Initial(id))
    }

    /// Decode as a backend-generated follow-up question (string id).
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] when the id is neither string nor number or a
    /// choice question has no options.
    pub fn into_follow_up(self) -> Result<Question, DecodeError> {
        let id = match &self.id {
            Value::String(s) if !s.is_empty() => s.clone(),
            Value::Number(n) => n.to_string(),
            other => {
                return Err(DecodeError(format!(
                    "follow-up question id {other} is not a string"
                )));
            }
        };
        self.finish(QuestionId::FollowUp(id))
    }

    fn finish(self, id: QuestionId) -> Result<Question, DecodeError> {
        let kind = self.kind.unwrap_or(if self.options.is_empty() {
            QuestionKind::FreeText
        } else {
            QuestionKind::SingleChoice
        });
        if kind.is_choice() && self.options.is_empty() {
            return Err(DecodeError(format!("{kind} question {id} has no options")));
        }
        let options = if kind.is_choice() {
            self.options
        } else {
            Vec::new()
        };
        Ok(Question {
            id,
            prompt: self.prompt,
            kind,
            options,
        })
    }
}

/// `GET /api/modules/{domain}` reply.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct QuestionsResponse {
    pub questions: Vec<RawQuestion>,
}

/// Reply to a phase submission: either follow-up questions or recommendations.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct SubmitResponse {
    #[serde(default, alias = "follow_up_questions", skip_serializing_if = "Option::is_none")]
    pub ai_questions: Option<Vec<RawQuestion>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<Vec<Recommendation>>,
}

/// Reply carrying recommendations only (follow-up submit, search).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct RecommendationsResponse {
    pub recommendations: Vec<Recommendation>,
}

/// Decoded result of a phase submission.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "outcome", content = "items", rename_all = "snake_case")]
pub enum PhaseOutcome {
    FollowUp(Vec<Question>),
    Recommendations(Vec<Recommendation>),
}

impl SubmitResponse {
    /// Decode the reply, preferring recommendations when both are present.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] when neither field is present, a question does
    /// not decode, or a score is out of range.
    pub fn into_outcome(self) -> Result<PhaseOutcome, DecodeError> {
        if let Some(recommendations) = self.recommendations {
            return validate_recommendations(recommendations).map(PhaseOutcome::Recommendations);
        }
        let Some(raw) = self.ai_questions else {
            return Err(DecodeError(
                "response has neither follow-up questions nor recommendations".into(),
            ));
        };
        raw.into_iter()
            .map(RawQuestion::into_follow_up)
            .collect::<Result<Vec<_>, _>>()
            .map(PhaseOutcome::FollowUp)
    }
}

/// Check the score range of every recommendation.
///
/// # Errors
///
/// Returns [`DecodeError`] naming the first record whose score is outside 0-100.
pub fn validate_recommendations(
    recommendations: Vec<Recommendation>,
) -> Result<Vec<Recommendation>, DecodeError> {
    if let Some(bad) = recommendations.iter().find(|r| !r.has_valid_score()) {
        return Err(DecodeError(format!(
            "recommendation {} has score {} outside 0-100",
            bad.id, bad.score
        )));
    }
    Ok(recommendations)
}
