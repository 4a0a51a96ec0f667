use anyhow::Context;
use campus_config::CampusConfig;

/// Load `.env` (if any) and the layered configuration.
pub fn load_config() -> anyhow::Result<CampusConfig> {
    CampusConfig::load_with_dotenv().context("failed to load campus configuration")
}
