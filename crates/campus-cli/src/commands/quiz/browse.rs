use campus_client::QuizBackend;
use campus_core::QuizError;
use campus_core::entities::Recommendation;
use campus_core::enums::SortKey;
use campus_engine::QuizEngine;
use campus_store::SessionStore;
use tokio::io::AsyncBufRead;

use super::prompt::Prompt;
use crate::progress::with_spinner;

/// One browsing command typed at the recommendations prompt.
#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    Select(&'a str),
    Details(&'a str),
    Sort(&'a str),
    Filter(&'a str),
    Search(&'a str),
    Commit,
    Done,
    Help,
}

fn parse<'a>(line: &'a str, action_label: &str) -> Command<'a> {
    let (verb, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();
    match verb {
        "" | "done" | ":q" | ":quit" => Command::Done,
        "select" | "s" => Command::Select(rest),
        "details" | "d" => Command::Details(rest),
        "sort" => Command::Sort(rest),
        "filter" | "f" => Command::Filter(rest),
        "search" => Command::Search(rest),
        "commit" => Command::Commit,
        verb if verb == action_label => Command::Commit,
        _ => Command::Help,
    }
}

/// Interactive loop over the recommendations until `done` or end of input.
pub async fn run<B, S, R>(engine: &mut QuizEngine<B, S>, prompt: &mut Prompt<R>) -> anyhow::Result<()>
where
    B: QuizBackend,
    S: SessionStore,
    R: AsyncBufRead + Unpin,
{
    let action = engine.descriptor().action_label.clone();
    loop {
        show(engine);
        let Some(line) = prompt.ask("recommendations> ").await? else {
            return Ok(());
        };
        let result = match parse(&line, &action) {
            Command::Done => return Ok(()),
            Command::Select(target) => resolve(engine, target).and_then(|id| engine.select(&id).map(drop)),
            Command::Details(target) => resolve(engine, target)
                .and_then(|id| engine.presenter_mut().toggle_expansion(&id).map(drop)),
            Command::Sort(key) => {
                engine.presenter_mut().sort_by(SortKey::parse(key));
                Ok(())
            }
            Command::Filter(query) => {
                engine.presenter_mut().filter_by_substring(query);
                Ok(())
            }
            Command::Search(text) => with_spinner("Searching…", engine.search(text)).await.map(drop),
            Command::Commit => with_spinner("Sending…", engine.commit_selection())
                .await
                .map(|response| {
                    eprintln!(
                        "  {}",
                        response.message.unwrap_or_else(|| format!("Done: {action} confirmed."))
                    );
                }),
            Command::Help => {
                eprintln!(
                    "  commands: select <n|id>, details <n|id>, sort <score|title|field>, filter <text>, search <text>, {action}, done"
                );
                Ok(())
            }
        };
        if let Err(error) = result {
            if !error.is_recoverable() {
                return Err(error.into());
            }
            eprintln!("  {}", error.user_message());
        }
    }
}

/// A 1-based position in the current view, or a recommendation id.
fn resolve<B: QuizBackend, S: SessionStore>(
    engine: &QuizEngine<B, S>,
    target: &str,
) -> Result<String, QuizError> {
    let view = engine.presenter().view();
    if let Ok(number) = target.parse::<usize>() {
        if let Some(rec) = number.checked_sub(1).and_then(|i| view.get(i)) {
            return Ok(rec.id.clone());
        }
    }
    Ok(target.to_string())
}

fn show<B: QuizBackend, S: SessionStore>(engine: &QuizEngine<B, S>) {
    let presenter = engine.presenter();
    let view = presenter.view();
    eprintln!();
    if view.is_empty() {
        eprintln!("  (no recommendations match)");
    }
    for (number, rec) in view.iter().enumerate() {
        let mark = if presenter.is_selected(&rec.id) { "x" } else { " " };
        eprintln!("  {}. [{mark}] {} ({:.0})", number + 1, rec.title, rec.score);
        if presenter.is_expanded(&rec.id) {
            show_details(rec);
        }
    }
}

fn show_details(rec: &Recommendation) {
    if !rec.description.is_empty() {
        eprintln!("       {}", rec.description);
    }
    for reason in &rec.why_perfect {
        eprintln!("       + {reason}");
    }
    for quote in &rec.student_quotes {
        eprintln!("       \"{quote}\"");
    }
    if !rec.tags.is_empty() {
        eprintln!("       tags: {}", rec.tags.join(", "));
    }
    for (key, value) in &rec.extra {
        eprintln!("       {key}: {value}");
    }
    if !rec.also_liked.is_empty() {
        eprintln!("       students also liked: {}", rec.also_liked.join(", "));
    }
}

#[cfg(test)]
mod tests {
    use campus_client::SimulatedBackend;
    use campus_core::entities::{AnswerValue, QuestionId};
    use campus_engine::{DomainRegistry, EngineOptions, QuizEngine};
    use campus_store::MemoryStore;

    use super::{Command, Prompt, parse, run};

    #[test]
    fn commands_parse_with_arguments() {
        assert_eq!(parse("select 2", "enroll"), Command::Select("2"));
        assert_eq!(parse("search closer to the gym", "enroll"), Command::Search("closer to the gym"));
        assert_eq!(parse("enroll", "enroll"), Command::Commit);
        assert_eq!(parse("", "enroll"), Command::Done);
        assert_eq!(parse("dance", "enroll"), Command::Help);
    }

    #[tokio::test]
    async fn select_by_position_and_commit() {
        let descriptor = DomainRegistry::builtin().get("enrollment").unwrap().clone();
        let mut engine = QuizEngine::new(
            descriptor,
            SimulatedBackend::new(),
            MemoryStore::new(),
            EngineOptions::default(),
        );
        engine.start().await.unwrap();
        for (id, value) in [(1, "Computer science"), (2, "Morning")] {
            engine
                .set_answer(&QuestionId::Initial(id), AnswerValue::Single(value.into()))
                .unwrap();
            engine.advance().await.unwrap();
        }
        engine
            .set_answer(&QuestionId::Initial(3), AnswerValue::Multi(vec!["Programming".into()]))
            .unwrap();
        engine.advance().await.unwrap();
        engine
            .set_answer(&QuestionId::from("f1"), AnswerValue::Single("evenings".into()))
            .unwrap();
        engine.advance().await.unwrap();
        let f2 = engine.current_question().unwrap().clone();
        engine
            .set_answer(&f2.id, AnswerValue::Multi(vec![f2.options[0].clone()]))
            .unwrap();
        engine.advance().await.unwrap();

        let first = engine.presenter().view()[0].id.clone();
        let input = b"select 1\nenroll\ndone\n";
        run(&mut engine, &mut Prompt::new(&input[..])).await.unwrap();

        assert!(engine.presenter().is_selected(&first));
    }
}
