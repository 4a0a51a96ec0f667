//! Integration tests for TOML configuration loading.
//!
//! Uses figment::Jail for safe, sandboxed env var manipulation.

use campus_config::CampusConfig;
use campus_core::enums::SearchMerge;
use figment::{
    Figment, Jail,
    providers::{Env, Format, Serialized, Toml},
};

#[test]
fn loads_backend_config_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[backend]
base_url = "https://portal.example.edu"
timeout_secs = 12
user_agent = "campus-test"
"#,
        )?;

        let config: CampusConfig = Figment::from(Serialized::defaults(CampusConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.backend.base_url, "https://portal.example.edu");
        assert_eq!(config.backend.timeout_secs, 12);
        assert_eq!(config.backend.user_agent, "campus-test");
        assert!(config.backend.is_configured());
        Ok(())
    });
}

#[test]
fn loads_domain_descriptors_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[[domains]]
name = "dining"
title = "Dining plans"
search_path = "/api/dining/search"
search_merge = "append"

[[domains]]
name = "clubs"
selection_cap = 3
follow_up_path = "/api/modules/{domain}/followup"
"#,
        )?;

        let config: CampusConfig = Figment::from(Serialized::defaults(CampusConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.domains.len(), 2);
        let dining = &config.domains[0];
        assert_eq!(dining.name, "dining");
        assert_eq!(dining.search_merge, SearchMerge::Append);
        assert!(!dining.has_follow_up());
        assert_eq!(dining.questions_path, "/api/modules/{domain}");

        let clubs = &config.domains[1];
        assert_eq!(clubs.selection_cap, Some(3));
        assert!(clubs.has_follow_up());
        Ok(())
    });
}

#[test]
fn project_config_is_picked_up_by_load() {
    Jail::expect_with(|jail| {
        std::fs::create_dir_all(jail.directory().join(".campus")).map_err(|e| e.to_string())?;
        jail.create_file(
            ".campus/config.toml",
            r#"
[general]
selection_cap = 2
offline = true

[storage]
dir = "results"
"#,
        )?;

        let config = CampusConfig::load().map_err(|e| e.to_string())?;
        assert_eq!(config.general.selection_cap, 2);
        assert!(config.general.offline);
        assert_eq!(config.storage.dir, "results");
        Ok(())
    });
}

#[test]
fn env_overrides_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[backend]
base_url = "https://from-toml.example.edu"
"#,
        )?;
        jail.set_env("CAMPUS_BACKEND__BASE_URL", "https://from-env.example.edu");

        let config: CampusConfig = Figment::from(Serialized::defaults(CampusConfig::default()))
            .merge(Toml::file("config.toml"))
            .merge(Env::prefixed("CAMPUS_").split("__"))
            .extract()?;

        assert_eq!(config.backend.base_url, "https://from-env.example.edu");
        Ok(())
    });
}

#[test]
fn invalid_values_fail_validation() {
    Jail::expect_with(|jail| {
        jail.set_env("CAMPUS_GENERAL__SELECTION_CAP", "0");
        let result = CampusConfig::load();
        assert!(result.is_err());
        Ok(())
    });
}

#[test]
fn missing_sections_use_defaults() {
    Jail::expect_with(|jail| {
        jail.create_file("config.toml", "")?;

        let config: CampusConfig = Figment::from(Serialized::defaults(CampusConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert!(!config.backend.is_configured());
        assert_eq!(config.backend.timeout_secs, 30);
        assert_eq!(config.general.selection_cap, 5);
        assert!(config.storage.enabled);
        Ok(())
    });
}
