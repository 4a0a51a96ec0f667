use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, bail};
use campus_client::QuizBackend;
use campus_core::entities::AnswerValue;
use campus_engine::QuizEngine;
use campus_store::SessionStore;

use crate::progress::with_spinner;

/// Answers keyed by question id as printed (`"1"`, `"f1"`).
pub type AnswerFile = BTreeMap<String, AnswerValue>;

pub fn load(path: &Path) -> anyhow::Result<AnswerFile> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read answers from {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| {
        format!(
            "{} must be a JSON object mapping question ids to a string or a list of strings",
            path.display()
        )
    })
}

/// Answer every question from the file until recommendations arrive.
pub async fn run<B: QuizBackend, S: SessionStore>(
    engine: &mut QuizEngine<B, S>,
    path: &Path,
) -> anyhow::Result<()> {
    let answers = load(path)?;
    answer_all(engine, &answers).await
}

pub async fn answer_all<B: QuizBackend, S: SessionStore>(
    engine: &mut QuizEngine<B, S>,
    answers: &AnswerFile,
) -> anyhow::Result<()> {
    while let Some(question) = engine.current_question().cloned() {
        let key = question.id.to_string();
        let Some(value) = answers.get(&key) else {
            bail!("no answer for question {key}: {}", question.prompt);
        };
        engine
            .set_answer(&question.id, value.clone())
            .with_context(|| format!("invalid answer for question {key}"))?;
        with_spinner("Thinking…", engine.advance()).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use campus_client::SimulatedBackend;
    use campus_core::enums::Phase;
    use campus_engine::{DomainRegistry, EngineOptions, QuizEngine};
    use campus_store::MemoryStore;

    use super::{AnswerFile, answer_all, load};

    #[test]
    fn answer_file_accepts_strings_and_lists() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"1": "A", "f2": ["quiet", "social"]}}"#).unwrap();
        let answers = load(file.path()).unwrap();
        assert_eq!(answers.len(), 2);
    }

    #[test]
    fn non_object_file_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[1, 2]").unwrap();
        assert!(load(file.path()).is_err());
    }

    #[tokio::test]
    async fn two_phase_domain_reaches_recommendations() {
        let descriptor = DomainRegistry::builtin().get("roommate").unwrap().clone();
        let mut engine = QuizEngine::new(
            descriptor,
            SimulatedBackend::new(),
            MemoryStore::new(),
            EngineOptions::default(),
        );
        engine.start().await.unwrap();

        let answers: AnswerFile = serde_json::from_str(
            r#"{"1": "Late", "2": "Relaxed", "3": ["Music", "Gaming"]}"#,
        )
        .unwrap();
        answer_all(&mut engine, &answers).await.unwrap();

        assert_eq!(engine.phase(), Phase::Recommendations);
        assert!(!engine.presenter().records().is_empty());
    }

    #[tokio::test]
    async fn missing_answer_names_the_question() {
        let descriptor = DomainRegistry::builtin().get("roommate").unwrap().clone();
        let mut engine = QuizEngine::new(
            descriptor,
            SimulatedBackend::new(),
            MemoryStore::new(),
            EngineOptions::default(),
        );
        engine.start().await.unwrap();

        let err = answer_all(&mut engine, &Default::default()).await.unwrap_err();
        assert!(err.to_string().starts_with("no answer for question 1"));
        assert_eq!(engine.phase(), Phase::Initial);
    }
}
