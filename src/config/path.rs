//! Path helpers for configuration files.
//!
//! Supports absolute paths, relative paths, and "~" home directory expansion.

use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::error::{FocusError, Result};

/// Directory name under the platform config directory.
pub const APP_DIR: &str = "flifocus";

/// File name of the default configuration file.
pub const CONFIG_FILE: &str = "config.toml";

/// Expand a leading `~` to the home directory.
///
/// Resolution rules:
/// 1. Paths starting with `~`: expanded to home directory
/// 2. Anything else: returned unchanged
pub fn expand_home(path: &Path) -> Result<PathBuf> {
    trace!(path = %path.display(), "Expanding path");

    let path_str = path.to_string_lossy();
    if path_str == "~" || path_str.starts_with("~/") {
        let home = home_dir()?;
        let rest = path_str.strip_prefix("~/").unwrap_or("");
        let resolved = if rest.is_empty() {
            home
        } else {
            home.join(rest)
        };
        debug!(
            original = %path.display(),
            resolved = %resolved.display(),
            "Expanded home directory path"
        );
        return Ok(resolved);
    }

    Ok(path.to_path_buf())
}

/// Resolve the user's home directory (cross-platform).
pub fn home_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .ok_or_else(|| FocusError::ConfigInvalid("Could not determine home directory".to_string()))
}

/// Default configuration file location, e.g. `~/.config/flifocus/config.toml`.
pub fn default_config_path() -> Result<PathBuf> {
    let base = dirs::config_dir().ok_or_else(|| {
        FocusError::ConfigInvalid("Could not determine configuration directory".to_string())
    })?;
    Ok(base.join(APP_DIR).join(CONFIG_FILE))
}
