//! `campus quiz`: run a domain's wizard and print the recommendations.
//!
//! Without `--answers` the wizard is driven from stdin and the user can
//! browse, search and act on the recommendations afterwards.

mod browse;
mod interactive;
mod prompt;
mod scripted;

use campus_client::{BackendClient, QuizBackend, SimulatedBackend};
use campus_core::entities::DomainDescriptor;
use campus_engine::QuizEngine;
use campus_store::SessionStore;
use tokio::io::AsyncBufRead;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::QuizArgs;
use crate::commands::shared::limit::apply_limit;
use crate::commands::shared::rows::RecommendationRow;
use crate::context::AppContext;
use crate::output::output;
use crate::progress::with_spinner;
use crate::ui;

use prompt::Prompt;

/// Handle `campus quiz`.
pub async fn handle(args: &QuizArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let descriptor = ctx.registry.get(&args.domain)?.clone();
    if ctx.offline(args.offline) {
        if !args.offline && !ctx.config.general.offline {
            tracing::warn!("backend.base_url is not configured; using the simulated backend");
        }
        run(SimulatedBackend::new(), descriptor, args, ctx, flags).await
    } else {
        let backend = BackendClient::from_config(ctx.config.require_backend()?)?;
        run(backend, descriptor, args, ctx, flags).await
    }
}

async fn run<B: QuizBackend>(
    backend: B,
    descriptor: DomainDescriptor,
    args: &QuizArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let mut engine = QuizEngine::new(descriptor, backend, ctx.open_store(), ctx.engine_options());
    let mut prompt = Prompt::stdin();

    if args.restart {
        engine.forget_saved()?;
    } else if engine.resume() {
        if !flags.quiet {
            eprintln!(
                "Showing saved results for '{}'. Use --restart to take the quiz again.",
                engine.descriptor().name
            );
            let answered = engine.saved_answers().len();
            if answered > 0 {
                eprintln!("Based on {answered} saved answer(s).");
            }
        }
        if args.answers.is_none() {
            browse::run(&mut engine, &mut prompt).await?;
        }
        return report(&engine, flags);
    }

    with_spinner("Loading questions…", engine.start()).await?;

    match &args.answers {
        Some(path) => scripted::run(&mut engine, path).await?,
        None => {
            if !ui::prefs().interactive {
                tracing::warn!("stdin is not a terminal; reading answers line by line (see --answers)");
            }
            if !walk(&mut engine, &mut prompt).await? {
                tracing::debug!("quiz abandoned");
                return Ok(());
            }
        }
    }
    report(&engine, flags)
}

/// Answer the wizard, then browse the recommendations, from one prompt.
/// Returns `false` if the quiz was abandoned.
async fn walk<B, S, R>(engine: &mut QuizEngine<B, S>, prompt: &mut Prompt<R>) -> anyhow::Result<bool>
where
    B: QuizBackend,
    S: SessionStore,
    R: AsyncBufRead + Unpin,
{
    if !interactive::run(engine, prompt).await? {
        return Ok(false);
    }
    browse::run(engine, prompt).await?;
    Ok(true)
}

fn report<B: QuizBackend, S: SessionStore>(
    engine: &QuizEngine<B, S>,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let presenter = engine.presenter();
    let rows = presenter
        .view()
        .into_iter()
        .map(|rec| RecommendationRow::new(rec, presenter.is_selected(&rec.id)))
        .collect::<Vec<_>>();
    output(&apply_limit(rows, flags.limit), flags.format)
}
