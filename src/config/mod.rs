//! Configuration module.
//!
//! Handles locating, loading and validating the flifocus configuration
//! file. Command-line flags override what is loaded here.

mod loader;
mod path;
mod schema;

pub use loader::{
    ConfigFormat, ConfigSource, LoadedConfig, load, load_config_from_str, load_file, to_toml,
};
pub use path::{default_config_path, expand_home, home_dir};
pub use schema::{
    Config, ConnectionConfig, LimitsConfig, MotionConfig, SimulatorConfig,
};
