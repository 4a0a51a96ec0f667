//! Entity structs for Campus quiz flows.
//!
//! All structs derive `Serialize`, `Deserialize`, and `JsonSchema` for JSON
//! roundtrip and schema validation.

mod answer;
mod domain;
mod persisted;
mod question;
mod recommendation;

pub use answer::AnswerValue;
pub use domain::{DomainDescriptor, PersistenceKeys};
pub use persisted::PersistedResult;
pub use question::{Question, QuestionId};
pub use recommendation::Recommendation;
