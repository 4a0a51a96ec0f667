use anyhow::Context;
use campus_core::entities::PersistenceKeys;
use campus_core::responses::ResponseEntry;
use campus_store::ResultPersistence;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::ResultsCommands;
use crate::commands::shared::limit::apply_limit;
use crate::commands::shared::rows::RecommendationRow;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct SavedResult {
    domain: String,
    saved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    completed_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    selected_id: Option<String>,
    recommendations: Vec<RecommendationRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    answers: Option<Vec<ResponseEntry>>,
}

#[derive(Debug, Serialize)]
struct Cleared {
    domain: String,
    cleared: Vec<String>,
}

/// Handle `campus results`.
pub fn handle(action: &ResultsCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        ResultsCommands::Show { domain } => show(domain, ctx, flags),
        ResultsCommands::Clear { domain } => clear(domain, ctx, flags),
    }
}

fn keys_for<'a>(ctx: &'a AppContext, domain: &str) -> anyhow::Result<&'a PersistenceKeys> {
    ctx.registry
        .get(domain)?
        .persistence
        .as_ref()
        .with_context(|| format!("domain '{domain}' does not save results"))
}

fn show(domain: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let keys = keys_for(ctx, domain)?;
    let store = ctx.open_store();
    let persistence = ResultPersistence::new(keys);

    let view = match persistence.load_completed(&*store) {
        Some(result) => {
            let selected = result.selected_id.clone();
            let rows = result
                .recommendations
                .iter()
                .map(|rec| RecommendationRow::new(rec, selected.as_deref() == Some(rec.id.as_str())))
                .collect();
            SavedResult {
                domain: domain.to_string(),
                saved: true,
                completed_at: result.completed_at.map(|at| at.to_rfc3339()),
                selected_id: selected,
                recommendations: apply_limit(rows, flags.limit),
                answers: persistence.load_answers(&*store),
            }
        }
        None => SavedResult {
            domain: domain.to_string(),
            saved: false,
            completed_at: None,
            selected_id: None,
            recommendations: Vec::new(),
            answers: None,
        },
    };
    output(&view, flags.format)
}

fn clear(domain: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let keys = keys_for(ctx, domain)?;
    let mut store = ctx.open_store();
    ResultPersistence::new(keys)
        .clear(&mut *store)
        .with_context(|| format!("failed to clear saved results for '{domain}'"))?;
    tracing::debug!(domain, "cleared saved results");
    output(
        &Cleared {
            domain: domain.to_string(),
            cleared: keys.all().into_iter().map(str::to_string).collect(),
        },
        flags.format,
    )
}
