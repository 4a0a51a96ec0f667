use std::path::PathBuf;
use std::time::Duration;

use campus_config::CampusConfig;
use campus_engine::{DomainRegistry, EngineOptions};
use campus_store::{FileStore, MemoryStore, SessionStore};

/// Everything a command needs: configuration, domains and storage.
pub struct AppContext {
    pub config: CampusConfig,
    pub registry: DomainRegistry,
    storage_dir: Option<PathBuf>,
}

impl AppContext {
    pub fn init(config: CampusConfig) -> anyhow::Result<Self> {
        let registry = DomainRegistry::builtin().with_overrides(config.domains.clone());
        let storage_dir = if config.storage.enabled {
            let dir = config.storage.resolved_dir();
            if dir.is_none() {
                tracing::warn!("no data directory available; results will not be saved");
            }
            dir
        } else {
            None
        };
        tracing::debug!(
            domains = registry.len(),
            storage = ?storage_dir,
            "context initialized"
        );
        Ok(Self {
            config,
            registry,
            storage_dir,
        })
    }

    /// Open the session store: files under the storage directory, or an
    /// in-memory store when persistence is disabled.
    #[must_use]
    pub fn open_store(&self) -> Box<dyn SessionStore> {
        match &self.storage_dir {
            Some(dir) => Box::new(FileStore::new(dir.clone())),
            None => Box::new(MemoryStore::new()),
        }
    }

    #[must_use]
    pub const fn persists(&self) -> bool {
        self.storage_dir.is_some()
    }

    /// Whether quiz runs must use the simulated backend.
    #[must_use]
    pub fn offline(&self, requested: bool) -> bool {
        requested || self.config.general.offline || !self.config.backend.is_configured()
    }

    #[must_use]
    pub const fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            timeout: Duration::from_secs(self.config.backend.timeout_secs),
            selection_cap: self.config.general.selection_cap,
        }
    }
}
