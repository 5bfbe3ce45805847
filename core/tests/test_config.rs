use std::collections::HashMap;

use ridepower_core::config::{ENV_ACTIVITY_LIMIT, ENV_SUPABASE_KEY, ENV_SUPABASE_URL};
use ridepower_core::{load_config, save_config, ConfigError, EngineConfig};

#[test]
fn missing_file_gives_defaults() {
    let cfg = load_config("tests/does_not_exist.json").unwrap();
    assert_eq!(cfg, EngineConfig::default());
    assert_eq!(cfg.profile_activity_limit, 50);
    assert_eq!(cfg.pmc_display_days, 90);
}

#[test]
fn save_and_load_config() {
    let path = std::env::temp_dir().join("ridepower_test_config.json");
    let cfg = EngineConfig {
        profile_activity_limit: 20,
        supabase_url: Some("https://club.supabase.co".into()),
        ..EngineConfig::default()
    };
    save_config(&cfg, &path).unwrap();
    let loaded = load_config(&path).unwrap();
    assert_eq!(loaded, cfg);
    std::fs::remove_file(&path).ok();
}

#[test]
fn partial_file_keeps_other_defaults() {
    let path = std::env::temp_dir().join("ridepower_test_partial.json");
    std::fs::write(&path, r#"{"report_default_ftp": 240}"#).unwrap();
    let cfg = load_config(&path).unwrap();
    assert_eq!(cfg.report_default_ftp, 240.0);
    assert_eq!(cfg.report_default_max_hr, 185.0);
    std::fs::remove_file(&path).ok();
}

#[test]
fn invalid_file_values_are_rejected() {
    let path = std::env::temp_dir().join("ridepower_test_invalid.json");
    std::fs::write(&path, r#"{"profile_activity_limit": 0}"#).unwrap();
    assert!(matches!(load_config(&path), Err(ConfigError::Invalid(_))));
    std::fs::write(&path, "{ not json").unwrap();
    assert!(matches!(load_config(&path), Err(ConfigError::Parse(_))));
    std::fs::remove_file(&path).ok();
}

#[test]
fn overrides_from_lookup() {
    let vars: HashMap<&str, &str> = HashMap::from([
        (ENV_SUPABASE_URL, " https://club.supabase.co/ "),
        (ENV_SUPABASE_KEY, "anon-key"),
        (ENV_ACTIVITY_LIMIT, "25"),
    ]);
    let mut cfg = EngineConfig::default();
    cfg.apply_overrides_from(|k| vars.get(k).map(|v| v.to_string())).unwrap();
    assert_eq!(cfg.supabase_url.as_deref(), Some("https://club.supabase.co"));
    assert_eq!(cfg.profile_activity_limit, 25);
    assert_eq!(cfg.supabase_credentials().unwrap(), ("https://club.supabase.co", "anon-key"));
}

#[test]
fn bad_limit_override_is_an_error() {
    let mut cfg = EngineConfig::default();
    let err = cfg
        .apply_overrides_from(|k| (k == ENV_ACTIVITY_LIMIT).then(|| "fifty".to_string()))
        .unwrap_err();
    assert!(matches!(err, ConfigError::Env { var: ENV_ACTIVITY_LIMIT, .. }));
    assert_eq!(cfg.profile_activity_limit, 50);
}

#[test]
fn missing_credentials() {
    let cfg = EngineConfig { supabase_url: Some("https://x".into()), ..EngineConfig::default() };
    assert!(matches!(cfg.supabase_credentials(), Err(ConfigError::MissingField("supabase_key"))));
}
