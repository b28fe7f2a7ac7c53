//! Configuration loading from files and the environment.

mod support;

use std::io::Write;

use equipment_analytics::config::{AppConfig, ConfigError, CONFIG_PATH_ENV};
use support::with_scoped_env;
use tempfile::NamedTempFile;

const OVERRIDE_KEYS: [&str; 5] = [
    "HOST",
    "PORT",
    "MAX_UPLOAD_MB",
    "IQR_MULTIPLIER",
    "MIN_OUTLIER_SAMPLES",
];

fn config_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", content).unwrap();
    file
}

/// Explicit config path plus a clean slate for every override variable.
fn env_with<'a>(
    path: &'a str,
    overrides: &[(&'a str, &'a str)],
) -> Vec<(&'a str, Option<&'a str>)> {
    let mut changes: Vec<(&str, Option<&str>)> = OVERRIDE_KEYS
        .iter()
        .map(|key| (*key, overrides.iter().find(|(k, _)| k == key).map(|(_, v)| *v)))
        .collect();
    changes.push((CONFIG_PATH_ENV, Some(path)));
    changes
}

#[test]
fn loads_explicit_file() {
    let file = config_file(
        r#"
[server]
host = "127.0.0.1"
port = 3000
max_upload_mb = 5

[analytics]
iqr_multiplier = 3.0
min_outlier_samples = 8
"#,
    );
    let path = file.path().to_str().unwrap();

    let config = with_scoped_env(&env_with(path, &[]), AppConfig::load).unwrap();
    assert_eq!(config.bind_address(), "127.0.0.1:3000");
    assert_eq!(config.max_upload_bytes(), 5 * 1024 * 1024);
    assert_eq!(config.outlier_policy().iqr_multiplier, 3.0);
    assert_eq!(config.outlier_policy().min_samples, 8);
}

#[test]
fn environment_overrides_file() {
    let file = config_file("[server]\nport = 3000\n");
    let path = file.path().to_str().unwrap();

    let config = with_scoped_env(
        &env_with(path, &[("PORT", "4000"), ("IQR_MULTIPLIER", "2.0")]),
        AppConfig::load,
    )
    .unwrap();
    assert_eq!(config.server.port, 4000);
    assert_eq!(config.analytics.iqr_multiplier, 2.0);
    assert_eq!(config.analytics.min_outlier_samples, 4);
}

#[test]
fn invalid_values_are_rejected() {
    let file = config_file("[analytics]\niqr_multiplier = -1.0\n");
    let path = file.path().to_str().unwrap();
    let err = with_scoped_env(&env_with(path, &[]), AppConfig::load).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));

    let file = config_file("");
    let path = file.path().to_str().unwrap();
    let err = with_scoped_env(
        &env_with(path, &[("MIN_OUTLIER_SAMPLES", "many")]),
        AppConfig::load,
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnv { .. }));
}

#[test]
fn malformed_file_is_a_parse_error() {
    let file = config_file("[server\nport = ");
    let err = AppConfig::from_file(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
}

#[test]
fn missing_explicit_file_is_a_read_error() {
    let err = with_scoped_env(
        &env_with("/nonexistent/equipment.toml", &[]),
        AppConfig::load,
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
}
