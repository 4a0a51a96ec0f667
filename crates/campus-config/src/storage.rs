//! Local persistence configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const fn default_enabled() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Directory holding persisted quiz results. Empty means the platform
    /// data directory (`~/.local/share/campus` on Linux).
    #[serde(default)]
    pub dir: String,

    /// Whether completed results are persisted at all.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: String::new(),
            enabled: default_enabled(),
        }
    }
}

impl StorageConfig {
    /// Resolve the storage directory, if one can be determined.
    pub fn resolved_dir(&self) -> Option<PathBuf> {
        if self.dir.trim().is_empty() {
            dirs::data_local_dir().map(|p| p.join("campus"))
        } else {
            Some(PathBuf::from(self.dir.trim()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_dir_wins() {
        let config = StorageConfig {
            dir: "/tmp/campus-results".into(),
            ..Default::default()
        };
        assert_eq!(
            config.resolved_dir(),
            Some(PathBuf::from("/tmp/campus-results"))
        );
        assert!(config.enabled);
    }
}
