use campus_client::QuizBackend;
use campus_core::QuizError;
use campus_core::entities::Question;
use campus_core::enums::QuestionKind;
use campus_engine::{QuizEngine, StepOutcome};
use campus_store::SessionStore;
use tokio::io::AsyncBufRead;

use super::prompt::Prompt;
use crate::progress::with_spinner;

/// Walk the wizard from stdin. Returns `false` if the user quit or input
/// ended before recommendations.
///
/// Input per question: an option number or text, a comma-separated list for
/// multi-choice (toggles; a blank line moves on), `:back`, `:quit`. A blank
/// line keeps the current answer, which is also how a failed submission is
/// retried.
pub async fn run<B, S, R>(
    engine: &mut QuizEngine<B, S>,
    prompt: &mut Prompt<R>,
) -> anyhow::Result<bool>
where
    B: QuizBackend,
    S: SessionStore,
    R: AsyncBufRead + Unpin,
{
    while let Some(question) = engine.current_question().cloned() {
        show_question(engine, &question);
        let Some(line) = prompt.ask("> ").await? else {
            return Ok(false);
        };
        match line.as_str() {
            ":quit" | ":q" => return Ok(false),
            ":back" | ":b" => {
                engine.retreat();
                continue;
            }
            "" => {}
            input => {
                if let Err(error) = apply_input(engine, &question, input) {
                    eprintln!("  {}", error.user_message());
                    continue;
                }
                if question.kind == QuestionKind::MultiChoice {
                    continue;
                }
            }
        }

        match with_spinner("Thinking…", engine.advance()).await {
            Ok(StepOutcome::EnteredFollowUp { added }) => {
                eprintln!("\nThanks! {added} more question(s) to tailor your results.");
            }
            Ok(_) => {}
            Err(error) if error.is_recoverable() => {
                eprintln!("  {}", error.user_message());
                if error.is_retryable() {
                    eprintln!("  Press Enter to try again.");
                }
            }
            Err(error) => return Err(error.into()),
        }
    }
    Ok(true)
}

fn show_question<B: QuizBackend, S: SessionStore>(engine: &QuizEngine<B, S>, question: &Question) {
    let progress = engine.progress();
    eprintln!("\n[{}/{}] {}", progress.index + 1, progress.total, question.prompt);
    let current = engine.answer(&question.id);
    let chosen = current.map(|a| a.values()).unwrap_or_default();
    for (number, option) in question.options.iter().enumerate() {
        let mark = if chosen.contains(&option.as_str()) { "x" } else { " " };
        eprintln!("  {}. [{mark}] {option}", number + 1);
    }
    if question.kind == QuestionKind::FreeText {
        if let Some(answer) = current {
            eprintln!("  current: {}", answer.values().join(", "));
        }
    }
}

fn apply_input<B: QuizBackend, S: SessionStore>(
    engine: &mut QuizEngine<B, S>,
    question: &Question,
    input: &str,
) -> Result<(), QuizError> {
    match question.kind {
        QuestionKind::FreeText => engine.record_answer(&question.id, input),
        QuestionKind::SingleChoice => engine.record_answer(&question.id, resolve_option(question, input)),
        QuestionKind::MultiChoice => {
            for part in input.split(',').map(str::trim).filter(|p| !p.is_empty()) {
                engine.record_answer(&question.id, resolve_option(question, part))?;
            }
            Ok(())
        }
    }
}

/// Map a 1-based number or a case-insensitive option label to the option.
/// Anything else is passed through for the engine to reject.
fn resolve_option<'a>(question: &'a Question, input: &'a str) -> &'a str {
    if let Ok(number) = input.parse::<usize>() {
        if let Some(option) = number.checked_sub(1).and_then(|i| question.options.get(i)) {
            return option;
        }
    }
    question
        .options
        .iter()
        .find(|o| o.eq_ignore_ascii_case(input))
        .map_or(input, String::as_str)
}

#[cfg(test)]
mod tests {
    use campus_client::SimulatedBackend;
    use campus_core::entities::{AnswerValue, Question, QuestionId};
    use campus_core::enums::Phase;
    use campus_engine::{DomainRegistry, EngineOptions, QuizEngine};
    use campus_store::MemoryStore;
    use pretty_assertions::assert_eq;

    use super::{Prompt, resolve_option, run};

    async fn roommate() -> QuizEngine<SimulatedBackend, MemoryStore> {
        let descriptor = DomainRegistry::builtin().get("roommate").unwrap().clone();
        let mut engine = QuizEngine::new(
            descriptor,
            SimulatedBackend::new(),
            MemoryStore::new(),
            EngineOptions::default(),
        );
        engine.start().await.unwrap();
        engine
    }

    #[test]
    fn options_resolve_by_number_or_label() {
        let q = Question::single_choice(1, "Sleep?", &["Early", "Late"]);
        assert_eq!(resolve_option(&q, "2"), "Late");
        assert_eq!(resolve_option(&q, "early"), "Early");
        assert_eq!(resolve_option(&q, "9"), "9");
    }

    #[tokio::test]
    async fn stdin_script_completes_two_phase_quiz() {
        let mut engine = roommate().await;
        let input = b"2\n\n1\n1,2\n2\n\n";
        let done = run(&mut engine, &mut Prompt::new(&input[..])).await.unwrap();

        assert!(done);
        assert_eq!(engine.phase(), Phase::Recommendations);
    }

    #[tokio::test]
    async fn blank_line_without_answer_stays_put() {
        let mut engine = roommate().await;
        let input = b"\n:quit\n";
        let done = run(&mut engine, &mut Prompt::new(&input[..])).await.unwrap();

        assert!(!done);
        assert_eq!(engine.progress().index, 0);
    }

    #[tokio::test]
    async fn back_returns_to_previous_answer() {
        let mut engine = roommate().await;
        let input = b"Late\n:back\n";
        let done = run(&mut engine, &mut Prompt::new(&input[..])).await.unwrap();

        assert!(!done);
        assert_eq!(engine.progress().index, 0);
        assert_eq!(
            engine.answer(&QuestionId::Initial(1)),
            Some(&AnswerValue::Single("Late".into()))
        );
    }
}
