//! General application configuration.

use serde::{Deserialize, Serialize};

/// Default upper bound on selected recommendations.
const fn default_selection_cap() -> usize {
    5
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Selection cap applied when a domain does not set its own.
    #[serde(default = "default_selection_cap")]
    pub selection_cap: usize,

    /// Always use the simulated backend, even when a backend URL is set.
    #[serde(default)]
    pub offline: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            selection_cap: default_selection_cap(),
            offline: false,
        }
    }
}
