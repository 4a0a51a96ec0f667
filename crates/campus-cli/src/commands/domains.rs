use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct DomainRow {
    name: String,
    title: String,
    phases: u8,
    search: bool,
    action: String,
    selection_cap: usize,
    saves_results: bool,
}

/// Handle `campus domains`.
pub fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let rows = ctx
        .registry
        .iter()
        .map(|d| DomainRow {
            name: d.name.clone(),
            title: d.title.clone(),
            phases: if d.has_follow_up() { 3 } else { 2 },
            search: d.search_path.is_some(),
            action: if d.action_path.is_some() {
                d.action_label.clone()
            } else {
                "-".to_string()
            },
            selection_cap: d.selection_cap.unwrap_or(ctx.config.general.selection_cap),
            saves_results: d.persistence.is_some(),
        })
        .collect::<Vec<_>>();
    output(&rows, flags.format)
}
