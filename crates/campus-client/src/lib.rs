//! # campus-client
//!
//! Recommendation backend clients for Campus.
//!
//! A quiz flow talks to its backend through the [`QuizBackend`] seam:
//! - [`BackendClient`]: JSON over HTTP against the portal backend
//! - [`SimulatedBackend`]: deterministic offline agent with a canned catalog
//!
//! Endpoint paths come from the flow's [`DomainDescriptor`], with
//! `{domain}` replaced by the URL-encoded domain name.

mod client;
mod error;
mod http;
mod simulated;

pub use client::BackendClient;
pub use error::ClientError;
pub use simulated::SimulatedBackend;

use std::future::Future;

use campus_core::entities::{DomainDescriptor, Question, Recommendation};
use campus_core::enums::Phase;
use campus_core::responses::{
    ActionRequest, ActionResponse, PhaseOutcome, SearchRequest, SubmitRequest,
};

// ── Backend seam ───────────────────────────────────────────────────

/// Operations a quiz flow needs from its recommendation backend.
pub trait QuizBackend {
    /// Load the ordered initial question batch for a domain.
    fn fetch_initial_questions(
        &self,
        descriptor: &DomainDescriptor,
    ) -> impl Future<Output = Result<Vec<Question>, ClientError>> + Send;

    /// Submit the answers of one phase's batch.
    ///
    /// `phase` is the phase being completed; it selects the endpoint
    /// (`submit_path` for `initial`, `follow_up_path` for `follow_up`).
    fn submit_phase(
        &self,
        descriptor: &DomainDescriptor,
        phase: Phase,
        request: &SubmitRequest,
    ) -> impl Future<Output = Result<PhaseOutcome, ClientError>> + Send;

    /// Ask for alternative recommendations matching free text.
    fn search(
        &self,
        descriptor: &DomainDescriptor,
        request: &SearchRequest,
    ) -> impl Future<Output = Result<Vec<Recommendation>, ClientError>> + Send;

    /// Commit the terminal action (enroll, apply, join) on selected records.
    fn commit_action(
        &self,
        descriptor: &DomainDescriptor,
        request: &ActionRequest,
    ) -> impl Future<Output = Result<ActionResponse, ClientError>> + Send;
}
