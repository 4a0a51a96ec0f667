use clap::Subcommand;

/// Saved result management.
#[derive(Clone, Debug, Subcommand)]
pub enum ResultsCommands {
    /// Show the saved result of a domain.
    Show {
        /// Domain name.
        domain: String,
    },
    /// Remove every saved key of a domain.
    Clear {
        /// Domain name.
        domain: String,
    },
}
