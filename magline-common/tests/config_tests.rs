//! Unit tests for configuration resolution and graceful degradation
//!
//! Missing TOML files must not prevent startup, and the data root must be
//! resolved in CLI → ENV → TOML → default priority order.
//!
//! Note: Uses serial_test crate to prevent ENV variable race conditions.
//! Tests that manipulate MAGLINE_TEST_DATA_ROOT are marked with #[serial]
//! to ensure they run sequentially, not in parallel.

use magline_common::config::{resolve_data_root, TomlConfig};
use serial_test::serial;
use std::env;
use std::path::PathBuf;

const TEST_ENV_VAR: &str = "MAGLINE_TEST_DATA_ROOT";

#[test]
fn test_missing_toml_file_yields_defaults() {
    let config = TomlConfig::load(&PathBuf::from("/nonexistent/magline-sd.toml")).unwrap();
    assert!(config.data_root.is_none());
    assert!(config.bind_addr.is_none());
    assert!(config.predictor_url.is_none());
}

#[test]
fn test_toml_file_parsing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("magline-sd.toml");
    std::fs::write(
        &path,
        "data_root = \"/tmp/magline-test\"\nbind_addr = \"127.0.0.1:9999\"\n",
    )
    .unwrap();

    let config = TomlConfig::load(&path).unwrap();
    assert_eq!(config.data_root.as_deref(), Some("/tmp/magline-test"));
    assert_eq!(config.bind_addr.as_deref(), Some("127.0.0.1:9999"));
    assert!(config.predictor_url.is_none());
}

#[test]
fn test_malformed_toml_is_a_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("magline-sd.toml");
    std::fs::write(&path, "data_root = [not toml").unwrap();

    assert!(TomlConfig::load(&path).is_err());
}

#[test]
#[serial]
fn test_cli_argument_has_highest_priority() {
    env::set_var(TEST_ENV_VAR, "/tmp/from-env");
    let toml_config = TomlConfig {
        data_root: Some("/tmp/from-toml".to_string()),
        ..Default::default()
    };

    let resolved = resolve_data_root(Some("/tmp/from-cli"), TEST_ENV_VAR, &toml_config);
    assert_eq!(resolved, PathBuf::from("/tmp/from-cli"));

    env::remove_var(TEST_ENV_VAR);
}

#[test]
#[serial]
fn test_env_var_beats_toml() {
    env::set_var(TEST_ENV_VAR, "/tmp/from-env");
    let toml_config = TomlConfig {
        data_root: Some("/tmp/from-toml".to_string()),
        ..Default::default()
    };

    let resolved = resolve_data_root(None, TEST_ENV_VAR, &toml_config);
    assert_eq!(resolved, PathBuf::from("/tmp/from-env"));

    env::remove_var(TEST_ENV_VAR);
}

#[test]
#[serial]
fn test_toml_beats_compiled_default() {
    env::remove_var(TEST_ENV_VAR);
    let toml_config = TomlConfig {
        data_root: Some("/tmp/from-toml".to_string()),
        ..Default::default()
    };

    let resolved = resolve_data_root(None, TEST_ENV_VAR, &toml_config);
    assert_eq!(resolved, PathBuf::from("/tmp/from-toml"));
}

#[test]
#[serial]
fn test_no_overrides_uses_compiled_default() {
    env::remove_var(TEST_ENV_VAR);

    let resolved = resolve_data_root(None, TEST_ENV_VAR, &TomlConfig::default());
    assert!(!resolved.as_os_str().is_empty());
}
