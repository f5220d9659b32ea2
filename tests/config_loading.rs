use std::io::Write;
use std::time::Duration;

use trendx_core::{CollectorConfig, ConfigError};

#[test]
fn empty_file_uses_defaults() {
    let config = CollectorConfig::from_toml_str("").expect("empty config is valid");
    assert_eq!(config, CollectorConfig::default());
    assert_eq!(config.min_interval, Duration::from_secs(1));
    assert_eq!(config.quota_cooldown, Duration::from_secs(60));
    assert!(!config.enrich_related);
}

#[test]
fn loads_values_from_file() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(
        file,
        r#"
min_interval_ms = 250
quota_cooldown_ms = 5000
enrich_related = true
trending_limit = 5

[client]
language = "de-DE"
timeout_ms = 2500

[retry]
transient_retries = 3
backoff_base_ms = 100
"#
    )
    .expect("write config");

    let mut config = CollectorConfig::default();
    config
        .apply_toml(&std::fs::read_to_string(file.path()).expect("read back"))
        .expect("config should parse");

    assert_eq!(config.min_interval, Duration::from_millis(250));
    assert_eq!(config.quota_cooldown, Duration::from_secs(5));
    assert!(config.enrich_related);
    assert_eq!(config.trending_limit, 5);
    assert_eq!(config.client.language, "de-DE");
    assert_eq!(config.client.timeout, Duration::from_millis(2500));
    assert_eq!(config.transient_retry.max_retries, 3);
}

#[test]
fn load_reports_unreadable_path() {
    let dir = tempfile::tempdir().expect("temp dir");
    let missing = dir.path().join("absent.toml");

    let err = CollectorConfig::load(Some(&missing)).expect_err("must fail");
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn load_reads_file_from_disk() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("trendx.toml");
    std::fs::write(&path, "geo_limit = 3\n").expect("write config");

    let config = CollectorConfig::load(Some(&path)).expect("config should load");
    assert_eq!(config.geo_limit, 3);
}

#[test]
fn unknown_keys_are_rejected() {
    let err = CollectorConfig::from_toml_str("min_interval_secs = 1\n").expect_err("must fail");
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn zero_limits_are_rejected() {
    let err = CollectorConfig::from_toml_str("related_limit = 0\n").expect_err("must fail");
    assert!(matches!(
        err,
        ConfigError::InvalidValue {
            field: "related_limit",
            ..
        }
    ));
}

#[test]
fn environment_overrides_file_values() {
    let mut config = CollectorConfig::from_toml_str("min_interval_ms = 250\n").expect("valid");

    config
        .apply_env(|key| match key {
            "TRENDX_MIN_INTERVAL_MS" => Some(String::from("0")),
            "TRENDX_ENRICH_RELATED" => Some(String::from("true")),
            "TRENDX_LANGUAGE" => Some(String::from("fr-FR")),
            _ => None,
        })
        .expect("env should apply");

    assert_eq!(config.min_interval, Duration::ZERO);
    assert!(config.enrich_related);
    assert_eq!(config.client.language, "fr-FR");
}

#[test]
fn malformed_environment_value_is_reported() {
    let mut config = CollectorConfig::default();
    let err = config
        .apply_env(|key| (key == "TRENDX_QUOTA_COOLDOWN_MS").then(|| String::from("soon")))
        .expect_err("must fail");

    assert!(matches!(
        err,
        ConfigError::InvalidValue {
            field: "TRENDX_QUOTA_COOLDOWN_MS",
            ..
        }
    ));
}
