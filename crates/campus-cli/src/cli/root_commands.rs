use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::cli::subcommands::ResultsCommands;

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// List configured recommendation domains.
    Domains,
    /// Run a quiz and print its recommendations.
    Quiz(QuizArgs),
    /// Saved quiz results.
    Results {
        #[command(subcommand)]
        action: ResultsCommands,
    },
    /// Dump JSON schema for a registered type.
    Schema(SchemaArgs),
}

/// Arguments for `campus quiz`.
#[derive(Clone, Debug, Args)]
pub struct QuizArgs {
    /// Domain name (see `campus domains`).
    pub domain: String,
    /// Use the built-in simulated backend instead of the configured one.
    #[arg(long)]
    pub offline: bool,
    /// Ignore and discard any saved result for this domain.
    #[arg(long)]
    pub restart: bool,
    /// JSON file mapping question ids to answers; runs without prompting.
    #[arg(long, value_name = "FILE")]
    pub answers: Option<PathBuf>,
}

/// Arguments for `campus schema`.
#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    /// Type name, e.g. `question`, `recommendation`, `domain`.
    pub type_name: String,
}
