//! Errors raised while loading or validating configuration.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A TOML file or environment value could not be extracted.
    #[error("Configuration error: {0}")]
    Figment(#[from] figment::Error),

    /// A section needed by the requested operation is unset.
    #[error("'{section}' is not configured; set it in .campus/config.toml or CAMPUS_* variables")]
    NotConfigured { section: String },

    /// A field holds a value the engine cannot use.
    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    /// Two `[[domains]]` entries share a name.
    #[error("Domain '{name}' is configured more than once")]
    DuplicateDomain { name: String },
}
