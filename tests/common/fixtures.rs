//! Test fixture helpers for creating temporary configuration files.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Simulator settings used by most end-to-end tests.
pub const SIM_CONFIG: &str = r#"
device = "/dev/fliusb-test"

[simulator]
model = "FLI PDF Test"
serial = "PDF-TEST"
position = 1000
extent = 7000
temperature = 18.25
"#;

/// A configuration file in a temporary directory with automatic cleanup.
///
/// # Example
///
/// ```ignore
/// let config = TestConfig::toml(SIM_CONFIG);
/// cli.run_simulated(&config, &["status"]);
/// ```
pub struct TestConfig {
    _dir: TempDir,
    path: PathBuf,
}

impl TestConfig {
    /// Write `content` to `config.toml` in a fresh temp directory.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be written.
    #[must_use]
    pub fn toml(content: &str) -> Self {
        Self::with_name("config.toml", content)
    }

    /// Write `content` to `config.yaml` in a fresh temp directory.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be written.
    #[must_use]
    pub fn yaml(content: &str) -> Self {
        Self::with_name("config.yaml", content)
    }

    /// The standard simulator configuration.
    #[must_use]
    pub fn simulator() -> Self {
        Self::toml(SIM_CONFIG)
    }

    /// Simulator configuration with extra TOML appended.
    #[must_use]
    pub fn simulator_with(extra: &str) -> Self {
        Self::toml(&format!("{SIM_CONFIG}\n{extra}"))
    }

    fn with_name(name: &str, content: &str) -> Self {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let path = dir.path().join(name);
        std::fs::write(&path, content)
            .unwrap_or_else(|_| panic!("Failed to write config at {path:?}"));
        Self { _dir: dir, path }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}
