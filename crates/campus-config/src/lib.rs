//! # campus-config
//!
//! Layered configuration loading for Campus using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`CAMPUS_*` prefix, `__` as separator)
//! 2. Project-level `.campus/config.toml`
//! 3. User-level `~/.config/campus/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `CAMPUS_BACKEND__BASE_URL` -> `backend.base_url`,
//! `CAMPUS_GENERAL__SELECTION_CAP` -> `general.selection_cap`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use campus_config::CampusConfig;
//!
//! let config = CampusConfig::load_with_dotenv().expect("config");
//!
//! if config.backend.is_configured() {
//!     println!("Backend: {}", config.backend.base_url);
//! }
//! ```

mod backend;
mod error;
mod general;
mod storage;

pub use backend::BackendConfig;
pub use error::ConfigError;
pub use general::GeneralConfig;
pub use storage::StorageConfig;

use campus_core::entities::DomainDescriptor;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const ENV_PREFIX: &str = "CAMPUS_";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CampusConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub general: GeneralConfig,
    /// Extra or overriding domain descriptors, matched to built-ins by name.
    #[serde(default)]
    pub domains: Vec<DomainDescriptor>,
}

impl CampusConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need
    /// `.env` file loading.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with_env_overrides(&[])
    }

    /// Load configuration with `.env` file support.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv_from_workspace();
        Self::load()
    }

    /// Load configuration with externally supplied `CAMPUS_*` values.
    ///
    /// Overrides sit between the TOML files and the process environment, so
    /// a variable exported in the shell still wins.
    pub fn load_with_env_overrides(overrides: &[(String, String)]) -> Result<Self, ConfigError> {
        let mut figment = Self::file_figment();
        for (key, value) in overrides {
            if let Some(path) = env_key_to_path(key) {
                figment = figment.merge(Serialized::default(&path, value));
            }
        }
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Build the full figment provider chain.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    pub fn figment() -> Figment {
        Self::file_figment().merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Reject values the engine cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backend.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "backend.timeout_secs".into(),
                reason: "must be greater than zero".into(),
            });
        }
        if self.general.selection_cap == 0 {
            return Err(ConfigError::InvalidValue {
                field: "general.selection_cap".into(),
                reason: "must be greater than zero".into(),
            });
        }
        let url = self.backend.base_url.trim();
        if !url.is_empty() && !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                field: "backend.base_url".into(),
                reason: format!("'{url}' is not an http(s) URL"),
            });
        }
        if let Some(unnamed) = self.domains.iter().position(|d| d.name.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                field: format!("domains[{unnamed}].name"),
                reason: "must not be empty".into(),
            });
        }
        for (index, domain) in self.domains.iter().enumerate() {
            if self.domains[..index].iter().any(|d| d.name == domain.name) {
                return Err(ConfigError::DuplicateDomain {
                    name: domain.name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Backend section, or an error when it is not set.
    pub fn require_backend(&self) -> Result<&BackendConfig, ConfigError> {
        if self.backend.is_configured() {
            Ok(&self.backend)
        } else {
            Err(ConfigError::NotConfigured {
                section: "backend".into(),
            })
        }
    }

    fn file_figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".campus/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("campus").join("config.toml"))
    }

    /// Load `.env` from the workspace root.
    ///
    /// Walks up from `CARGO_MANIFEST_DIR` (if available) or current dir looking
    /// for a `.env` file. Silently does nothing if no `.env` is found.
    fn load_dotenv_from_workspace() {
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let mut dir = PathBuf::from(manifest_dir);
            // crate -> crates/ -> workspace root
            for _ in 0..3 {
                let env_path = dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                    return;
                }
                if !dir.pop() {
                    break;
                }
            }
        }

        let _ = dotenvy::dotenv();
    }
}

/// Map `CAMPUS_BACKEND__BASE_URL` to `backend.base_url`.
fn env_key_to_path(key: &str) -> Option<String> {
    let rest = key.strip_prefix(ENV_PREFIX)?;
    if rest.is_empty() {
        return None;
    }
    Some(rest.to_ascii_lowercase().replace("__", "."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_loads() {
        let config = CampusConfig::default();
        assert!(!config.backend.is_configured());
        assert!(config.storage.enabled);
        assert_eq!(config.general.selection_cap, 5);
        assert!(config.domains.is_empty());
    }

    #[test]
    fn figment_builds_without_files() {
        let figment = CampusConfig::figment();
        let config: CampusConfig = figment.extract().expect("should extract defaults");
        assert_eq!(config.backend.timeout_secs, 30);
    }

    #[test]
    fn env_keys_map_to_dotted_paths() {
        assert_eq!(
            env_key_to_path("CAMPUS_BACKEND__BASE_URL").as_deref(),
            Some("backend.base_url")
        );
        assert_eq!(env_key_to_path("OTHER_KEY"), None);
        assert_eq!(env_key_to_path("CAMPUS_"), None);
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let mut config = CampusConfig::default();
        config.backend.timeout_secs = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn validate_rejects_non_http_url() {
        let mut config = CampusConfig::default();
        config.backend.base_url = "ftp://portal".into();
        assert!(config.validate().is_err());
        config.backend.base_url = "https://portal.example.edu".into();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_duplicate_domains() {
        let config = CampusConfig {
            domains: vec![
                DomainDescriptor::new("tutoring"),
                DomainDescriptor::new("dorm"),
                DomainDescriptor::new("tutoring"),
            ],
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DuplicateDomain { name }) if name == "tutoring"
        ));
    }

    #[test]
    fn require_backend_reports_missing_section() {
        let config = CampusConfig::default();
        let err = config.require_backend().unwrap_err();
        assert!(err.to_string().contains("backend"));
    }
}
