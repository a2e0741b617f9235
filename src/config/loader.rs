//! Loading configuration from TOML or YAML files.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, instrument, trace};

use super::path::{default_config_path, expand_home};
use super::schema::Config;
use crate::error::{FocusError, Result};

/// Configuration file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML format (.yaml, .yml).
    Yaml,
    /// TOML format (.toml).
    Toml,
}

impl ConfigFormat {
    /// Detect format from file extension.
    ///
    /// Returns `None` if the extension is not recognized.
    #[must_use]
    pub fn from_extension(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        trace!(extension = %ext, "Detecting config format from extension");
        match ext.to_lowercase().as_str() {
            "yaml" | "yml" => Some(Self::Yaml),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }
}

/// Where the effective configuration came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigSource {
    /// Built-in defaults; no file was read.
    Defaults,
    /// Read from a file.
    File,
}

/// A configuration together with its origin.
#[derive(Debug, Clone, Serialize)]
pub struct LoadedConfig {
    pub path: PathBuf,
    pub source: ConfigSource,
    pub config: Config,
}

/// Load the configuration.
///
/// With `explicit` set, the file must exist. Without it, the default
/// location is tried and a missing file yields the defaults.
#[instrument]
pub fn load(explicit: Option<&Path>) -> Result<LoadedConfig> {
    let (path, required) = match explicit {
        Some(path) => (expand_home(path)?, true),
        None => (default_config_path()?, false),
    };

    if !path.exists() {
        if required {
            return Err(FocusError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }
        debug!(path = %path.display(), "No configuration file, using defaults");
        return Ok(LoadedConfig {
            path,
            source: ConfigSource::Defaults,
            config: Config::default(),
        });
    }

    let config = load_file(&path)?;
    Ok(LoadedConfig {
        path,
        source: ConfigSource::File,
        config,
    })
}

/// Load and validate a configuration file.
pub fn load_file(path: &Path) -> Result<Config> {
    debug!(path = %path.display(), "Loading configuration file");

    let format = ConfigFormat::from_extension(path).ok_or_else(|| {
        FocusError::ConfigParse(format!(
            "Unsupported config file extension: {} (expected .toml, .yaml or .yml)",
            path.display()
        ))
    })?;

    let content = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            FocusError::ConfigNotFound {
                path: path.display().to_string(),
            }
        } else {
            FocusError::Io(e)
        }
    })?;

    load_config_from_str(&content, format)
}

/// Parse and validate configuration text.
pub fn load_config_from_str(content: &str, format: ConfigFormat) -> Result<Config> {
    trace!(?format, "Parsing config content");

    let mut config: Config = match format {
        ConfigFormat::Yaml if content.trim().is_empty() => Config::default(),
        ConfigFormat::Yaml => serde_yaml::from_str(content)
            .map_err(|e| FocusError::ConfigParse(format!("YAML: {e}")))?,
        ConfigFormat::Toml => {
            toml::from_str(content).map_err(|e| FocusError::ConfigParse(format!("TOML: {e}")))?
        }
    };

    if let Some(log_file) = config.log_file.take() {
        config.log_file = Some(expand_home(&log_file)?);
    }

    config.validate()?;
    debug!(device = %config.device, "Configuration parsed");
    Ok(config)
}

/// Render a configuration as TOML.
pub fn to_toml(config: &Config) -> Result<String> {
    toml::to_string_pretty(config).map_err(|e| FocusError::ConfigParse(format!("TOML: {e}")))
}
