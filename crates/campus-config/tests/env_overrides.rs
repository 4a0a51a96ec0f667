use campus_config::CampusConfig;
use figment::Jail;

#[test]
fn external_overrides_fill_config_values() {
    Jail::expect_with(|_jail| {
        let overrides = vec![(
            "CAMPUS_BACKEND__BASE_URL".to_string(),
            "https://from-external.example.edu".to_string(),
        )];

        let config = CampusConfig::load_with_env_overrides(&overrides).expect("config loads");
        assert_eq!(config.backend.base_url, "https://from-external.example.edu");
        Ok(())
    });
}

#[test]
fn process_env_beats_external_overrides() {
    Jail::expect_with(|jail| {
        jail.set_env("CAMPUS_BACKEND__BASE_URL", "https://from-env.example.edu");
        let overrides = vec![(
            "CAMPUS_BACKEND__BASE_URL".to_string(),
            "https://from-external.example.edu".to_string(),
        )];

        let config = CampusConfig::load_with_env_overrides(&overrides).expect("config loads");
        assert_eq!(config.backend.base_url, "https://from-env.example.edu");
        Ok(())
    });
}

#[test]
fn unrelated_override_keys_are_ignored() {
    Jail::expect_with(|_jail| {
        let overrides = vec![("HOME".to_string(), "/nowhere".to_string())];
        let config = CampusConfig::load_with_env_overrides(&overrides).expect("config loads");
        assert!(!config.backend.is_configured());
        Ok(())
    });
}
