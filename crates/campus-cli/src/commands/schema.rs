use anyhow::bail;
use campus_core::entities::{
    AnswerValue, DomainDescriptor, PersistedResult, Question, Recommendation,
};
use campus_core::enums::Phase;
use campus_core::responses::{ActionRequest, ActionResponse, SearchRequest, SubmitRequest};
use schemars::schema_for;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SchemaArgs;
use crate::output::output;

const SCHEMA_TYPES: &[&str] = &[
    "question",
    "answer",
    "recommendation",
    "persisted-result",
    "domain",
    "phase",
    "submit-request",
    "search-request",
    "action-request",
    "action-response",
];

/// Handle `campus schema`.
pub fn handle(args: &SchemaArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let schema = schema_for_type(&args.type_name)?;
    output(&schema, flags.format)
}

fn schema_for_type(name: &str) -> anyhow::Result<serde_json::Value> {
    let normalized = name.trim().to_ascii_lowercase().replace('_', "-");
    let schema = match normalized.as_str() {
        "question" => schema_for!(Question),
        "answer" => schema_for!(AnswerValue),
        "recommendation" => schema_for!(Recommendation),
        "persisted-result" | "result" => schema_for!(PersistedResult),
        "domain" | "domain-descriptor" => schema_for!(DomainDescriptor),
        "phase" => schema_for!(Phase),
        "submit-request" => schema_for!(SubmitRequest),
        "search-request" => schema_for!(SearchRequest),
        "action-request" => schema_for!(ActionRequest),
        "action-response" => schema_for!(ActionResponse),
        _ => bail!(
            "unknown schema type '{name}'. Known types: {}",
            SCHEMA_TYPES.join(", ")
        ),
    };
    Ok(serde_json::to_value(schema)?)
}
