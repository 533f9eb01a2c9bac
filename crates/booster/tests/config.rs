//! Integration tests for layered configuration loading.

use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use booster::cli::Cli;
use booster::config::{BoosterConfig, DEFAULT_CONFIG_PATH};
use booster::ConfigError;
use clap::Parser;
use tempfile::NamedTempFile;

// =========================================================================
// Helpers
// =========================================================================

fn write_config(yaml: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(yaml.as_bytes()).unwrap();
    file
}

fn cli(args: &[&str]) -> Cli {
    let mut argv = vec!["booster"];
    argv.extend_from_slice(args);
    Cli::try_parse_from(argv).unwrap()
}

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| map.get(key).cloned()
}

fn no_env() -> impl Fn(&str) -> Option<String> {
    |_: &str| None
}

const FULL_YAML: &str = "\
username: alice
password: secret
app_ids: [730, 440, 570]
max_concurrent: 10
data_dir: /var/lib/booster
socks5: socks5://127.0.0.1:1080
heartbeat_secs: 120
backoff_min_secs: 3
backoff_max_secs: 90
log_level: debug
remember_session: false
forget_session: true
";

// =========================================================================
// File loading
// =========================================================================

#[test]
fn test_load_full_file() {
    let file = write_config(FULL_YAML);

    let config = BoosterConfig::load(file.path(), false).unwrap();

    assert_eq!(config.username.as_deref(), Some("alice"));
    assert_eq!(config.password.as_deref(), Some("secret"));
    assert_eq!(config.app_ids, vec!["730", "440", "570"]);
    assert_eq!(config.max_concurrent, 10);
    assert_eq!(config.data_dir, PathBuf::from("/var/lib/booster"));
    assert_eq!(config.socks5.as_deref(), Some("socks5://127.0.0.1:1080"));
    assert_eq!(config.heartbeat_secs, 120);
    assert_eq!(config.backoff_min_secs, 3);
    assert_eq!(config.backoff_max_secs, 90);
    assert_eq!(config.log_filter(), "debug");
    assert!(!config.remember_session);
    assert!(config.forget_session);
}

#[test]
fn test_load_partial_file_keeps_defaults() {
    let file = write_config("app_ids: [\"10\"]\n");

    let config = BoosterConfig::load(file.path(), false).unwrap();

    assert_eq!(config.app_ids, vec!["10"]);
    assert_eq!(config.max_concurrent, 32);
    assert_eq!(config.heartbeat_secs, 60);
    assert!(config.remember_session);
}

#[test]
fn test_load_missing_optional_file_is_default() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.yaml");

    let config = BoosterConfig::load(&path, true).unwrap();

    assert_eq!(config, BoosterConfig::default());
}

#[test]
fn test_load_missing_required_file_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.yaml");

    let result = BoosterConfig::load(&path, false);

    assert!(matches!(result, Err(ConfigError::Read { .. })));
}

#[test]
fn test_load_invalid_yaml_errors() {
    let file = write_config("heartbeat_secs: [not, a, number]\n");

    let result = BoosterConfig::load(file.path(), false);

    assert!(matches!(result, Err(ConfigError::Parse { .. })));
}

// =========================================================================
// Layering
// =========================================================================

#[test]
fn test_env_overrides_file() {
    let file = write_config(FULL_YAML);
    let path = file.path().to_str().unwrap();
    let env = env(&[
        ("STEAM_USERNAME", "bob"),
        ("STEAM_APPIDS", "1, 2,3"),
        ("STEAM_HEARTBEAT_SEC", "0"),
        ("STEAM_MAX_CONCURRENT", "4"),
    ]);

    let config = BoosterConfig::from_sources_with(&cli(&["--config", path]), env).unwrap();

    assert_eq!(config.username.as_deref(), Some("bob"));
    assert_eq!(config.app_ids, vec!["1", "2", "3"]);
    assert_eq!(config.heartbeat_secs, 0);
    assert_eq!(config.max_concurrent, 4);
    // Untouched by env.
    assert_eq!(config.backoff_min_secs, 3);
}

#[test]
fn test_cli_overrides_env() {
    let file = write_config(FULL_YAML);
    let path = file.path().to_str().unwrap();
    let env = env(&[("STEAM_APPIDS", "1,2"), ("STEAM_LOG_LEVEL", "warn")]);

    let config = BoosterConfig::from_sources_with(
        &cli(&["--config", path, "--appids", "99", "--log-level", "trace", "--no-remember"]),
        env,
    )
    .unwrap();

    assert_eq!(config.app_ids, vec!["99"]);
    assert_eq!(config.log_filter(), "trace");
    assert!(!config.remember_session);
}

#[test]
fn test_zero_cli_numbers_do_not_override() {
    let file = write_config(FULL_YAML);
    let path = file.path().to_str().unwrap();

    let config = BoosterConfig::from_sources_with(
        &cli(&["--config", path, "--heartbeat", "0", "--max-concurrent", "0"]),
        no_env(),
    )
    .unwrap();

    assert_eq!(config.heartbeat_secs, 120);
    assert_eq!(config.max_concurrent, 10);
}

#[test]
fn test_empty_env_values_are_ignored() {
    let mut config = BoosterConfig::default();

    config
        .apply_env(env(&[("STEAM_HEARTBEAT_SEC", ""), ("STEAM_USERNAME", "")]))
        .unwrap();

    assert_eq!(config.heartbeat_secs, 60);
    assert!(config.username.is_none());
}

#[test]
fn test_invalid_env_number_errors() {
    let mut config = BoosterConfig::default();

    let result = config.apply_env(env(&[("STEAM_BACKOFF_MAX_SEC", "lots")]));

    assert!(matches!(
        result,
        Err(ConfigError::InvalidEnv {
            key: "STEAM_BACKOFF_MAX_SEC",
            ..
        })
    ));
}

#[test]
fn test_default_path_is_optional() {
    // Runs from the crate directory, which has no config.yaml.
    let parsed = cli(&[]);
    assert_eq!(parsed.config, PathBuf::from(DEFAULT_CONFIG_PATH));

    let config = BoosterConfig::from_sources_with(&parsed, no_env()).unwrap();

    assert_eq!(config, BoosterConfig::default());
}

#[test]
fn test_explicit_missing_path_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nope.yaml");

    let result = BoosterConfig::from_sources_with(
        &cli(&["--config", path.to_str().unwrap()]),
        no_env(),
    );

    assert!(matches!(result, Err(ConfigError::Read { .. })));
}

// =========================================================================
// Service config
// =========================================================================

#[test]
fn test_service_config_from_layers() {
    let file = write_config(FULL_YAML);
    let path = file.path().to_str().unwrap();
    let config = BoosterConfig::from_sources_with(
        &cli(&["--config", path, "--backoff-max", "45"]),
        no_env(),
    )
    .unwrap();
    let service = config.service_config();

    assert_eq!(service.max_games, 10);
    assert_eq!(service.heartbeat.interval, Duration::from_secs(120));
    assert_eq!(service.heartbeat.backoff_min, Duration::from_secs(3));
    assert_eq!(service.heartbeat.backoff_max, Duration::from_secs(45));
}
