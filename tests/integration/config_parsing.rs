//! Integration tests for configuration loading.
//!
//! Tests verify file discovery, format detection, validation and the
//! mapping from config sections onto focuser options.

use std::path::Path;
use std::time::Duration;

use flifocus::config::{self, ConfigSource};
use flifocus::error::FocusError;
use flifocus::focuser::FocuserOperations;

use crate::common::env::EnvGuard;
use crate::common::fixtures::{SIM_CONFIG, TestConfig};

/// An explicit TOML file is loaded and marked as coming from a file.
#[test]
fn test_load_explicit_toml() {
    let file = TestConfig::simulator();

    let loaded = config::load(Some(file.path())).unwrap();

    assert_eq!(loaded.source, ConfigSource::File);
    assert_eq!(loaded.path, file.path());
    assert_eq!(loaded.config.device, "/dev/fliusb-test");
    assert_eq!(loaded.config.simulator.position, 1000);
}

/// An explicit path that does not exist is an error, not a silent default.
#[test]
fn test_missing_explicit_file_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.toml");

    let err = config::load(Some(&missing)).unwrap_err();
    assert!(matches!(err, FocusError::ConfigNotFound { .. }));
    assert!(err.suggestion().is_some());
}

/// YAML files use the same schema.
#[test]
fn test_load_yaml_file() {
    let file = TestConfig::yaml(
        "device: /dev/fliusb3\nlimits:\n  max_position: 4000\nmotion:\n  timeout_secs: 30\n",
    );

    let config = config::load_file(file.path()).unwrap();

    assert_eq!(config.device, "/dev/fliusb3");
    assert_eq!(config.limits.max_position, Some(4000));
    assert_eq!(config.tracking_options().timeout, Duration::from_secs(30));
}

/// Unknown extensions are rejected with a parse error.
#[test]
fn test_unsupported_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{}").unwrap();

    let err = config::load_file(&path).unwrap_err();
    assert!(matches!(err, FocusError::ConfigParse(_)));
}

/// Syntax errors surface as parse errors naming the format.
#[test]
fn test_malformed_toml() {
    let file = TestConfig::toml("[limits\nmax_position = 1\n");

    let err = config::load_file(file.path()).unwrap_err();
    assert!(err.to_string().contains("TOML"));
}

/// Values outside their valid range are rejected after parsing.
#[test]
fn test_invalid_connection_settings() {
    let file = TestConfig::toml("[connection]\nbackoff_factor = 0.5\n");

    let err = config::load_file(file.path()).unwrap_err();
    assert!(matches!(err, FocusError::ConfigInvalid(_)));
}

/// `~` in log_file is expanded to the home directory.
#[test]
fn test_log_file_home_expansion() {
    let config = config::load_config_from_str(
        "log_file = \"~/logs/focus.log\"\n",
        config::ConfigFormat::Toml,
    )
    .unwrap();

    let home = config::home_dir().unwrap();
    assert_eq!(config.log_file.unwrap(), home.join("logs/focus.log"));
}

/// The simulator section seeds the simulated focuser.
#[test]
fn test_simulator_section_builds_focuser() {
    let config = config::load_config_from_str(SIM_CONFIG, config::ConfigFormat::Toml).unwrap();

    let focuser = config.simulator_builder("/dev/sim").build();

    assert_eq!(focuser.info().device, "/dev/sim");
    assert_eq!(focuser.info().serial, "PDF-TEST");
    assert_eq!(focuser.model().unwrap(), "FLI PDF Test");
    assert_eq!(focuser.position().unwrap(), 1000);
    assert_eq!(focuser.extent().unwrap(), 7000);
}

/// Extra sections sit alongside the simulator settings.
#[test]
fn test_limits_with_simulator_section() {
    let file = TestConfig::simulator_with("[limits]\nmax_position = 5000\n");

    let loaded = config::load(Some(file.path())).unwrap();

    assert_eq!(loaded.config.limits.max_position, Some(5000));
    assert_eq!(loaded.config.simulator.position, 1000);
    assert_eq!(loaded.config.device, "/dev/fliusb-test");
}

/// Connection settings convert to retry options.
#[test]
fn test_connection_options_mapping() {
    let file = TestConfig::toml(
        "[connection]\nretries = 4\nretry_delay_ms = 250\nbackoff_factor = 2.0\nmax_delay_ms = 1000\n",
    );

    let opts = config::load_file(file.path()).unwrap().connection_options();

    assert_eq!(opts.max_retries, 4);
    assert_eq!(opts.retry_delay, Duration::from_millis(250));
    assert!((opts.backoff_factor - 2.0).abs() < f32::EPSILON);
    assert_eq!(opts.max_delay, Duration::from_secs(1));
}

/// The default location lives under the platform config directory.
#[test]
fn test_default_path_shape() {
    let path = config::default_config_path().unwrap();
    assert!(path.ends_with(Path::new("flifocus").join("config.toml")));
}

/// Without `--config`, a missing default file yields defaults and a
/// present one is read.
#[cfg(target_os = "linux")]
#[test]
fn test_default_location_discovery() {
    let dir = tempfile::tempdir().unwrap();
    let config_home = dir.path().to_str().unwrap().to_string();
    let _env = EnvGuard::set("XDG_CONFIG_HOME", &config_home);

    let loaded = config::load(None).unwrap();
    assert_eq!(loaded.source, ConfigSource::Defaults);
    assert_eq!(loaded.path, dir.path().join("flifocus").join("config.toml"));

    std::fs::create_dir_all(dir.path().join("flifocus")).unwrap();
    std::fs::write(&loaded.path, "device = \"/dev/fliusb5\"\n").unwrap();

    let loaded = config::load(None).unwrap();
    assert_eq!(loaded.source, ConfigSource::File);
    assert_eq!(loaded.config.device, "/dev/fliusb5");
}
