//! # campus-engine
//!
//! Generic quiz and recommendation flow engine for Campus.
//!
//! One [`QuizEngine`] drives any domain (housing, enrollment, jobs, clubs,
//! onboarding, roommate matching) from a declarative
//! [`DomainDescriptor`](campus_core::entities::DomainDescriptor):
//!
//! - [`answers::AnswerStore`]: answers keyed by question id
//! - [`wizard::Wizard`]: next/back over a growing list of question batches
//! - [`phase::PhaseMachine`]: `initial → follow_up → recommendations`
//! - [`presenter::RecommendationPresenter`]: sort, filter, select, expand
//! - [`domain::DomainRegistry`]: built-in descriptors plus configured ones

pub mod answers;
pub mod domain;
pub mod engine;
pub mod phase;
pub mod presenter;
pub mod wizard;

pub use domain::{DomainRegistry, builtin_descriptors};
pub use engine::{EngineOptions, PendingSubmit, Progress, QuizEngine, StepOutcome};
