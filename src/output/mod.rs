//! Output mode abstraction for robot and human output.

use serde::Serialize;

use crate::cli::Cli;
use crate::config::LoadedConfig;
use crate::error::FocusError;
use crate::focuser::sequence::{FocusObserver, GotoReport, HomeReport, MoveReport};
use crate::focuser::{FocuserStatus, ListedFocuser, TemperatureChannel};

pub mod human;
pub mod robot;

pub use human::HumanOutput;
pub use robot::RobotOutput;

/// JSON formatting options for robot mode.
#[derive(Debug, Clone, Copy)]
pub enum RobotFormat {
    /// Pretty-printed JSON (default for --robot).
    Json,
    /// Single-line JSON (--format=json-compact).
    JsonCompact,
}

/// Determines how command output is rendered.
#[derive(Debug, Clone, Copy)]
pub enum OutputMode {
    /// JSON output for AI agents and scripting.
    Robot(RobotFormat),
    /// Styled terminal output for human users.
    Human { color: bool, quiet: bool },
}

impl OutputMode {
    /// Create OutputMode from CLI arguments.
    #[must_use]
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.use_json() {
            let format = if cli.use_compact_json() {
                RobotFormat::JsonCompact
            } else {
                RobotFormat::Json
            };
            Self::Robot(format)
        } else {
            Self::Human {
                color: !cli.no_color,
                quiet: cli.quiet,
            }
        }
    }

    /// Convert into the appropriate Output implementation.
    #[must_use]
    pub fn into_output(self) -> Box<dyn Output> {
        match self {
            Self::Robot(format) => Box::new(RobotOutput::new(format)),
            Self::Human { color, quiet } => Box::new(HumanOutput::new(color, quiet)),
        }
    }
}

/// Build and version details for `version`.
#[derive(Debug, Clone, Serialize)]
pub struct VersionInfo {
    pub version: &'static str,
    pub git_sha: &'static str,
    pub git_dirty: bool,
    pub build_timestamp: &'static str,
    pub rustc_version: &'static str,
    pub target: &'static str,
    pub hardware_backend: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub libfli_version: Option<String>,
}

/// Trait for all output operations.
///
/// Commands call these methods without knowing the output mode. The
/// [`FocusObserver`] half receives readings as a sequence runs; the
/// report methods receive the final result.
pub trait Output: FocusObserver {
    /// View of this output as a sequence observer.
    fn observer(&self) -> &dyn FocusObserver;

    // Basic messages
    fn success(&self, message: &str);
    fn error(&self, error: &FocusError);
    fn warning(&self, message: &str);
    fn info(&self, message: &str);

    // Command results
    fn goto_report(&self, report: &GotoReport);
    fn step_report(&self, report: &MoveReport);
    fn home_report(&self, report: &HomeReport);
    fn status(&self, status: &FocuserStatus);
    fn position_report(&self, device: &str, position: i64);
    fn temperature_report(&self, device: &str, channel: TemperatureChannel, celsius: f64);
    fn focuser_list(&self, focusers: &[ListedFocuser]);

    // Configuration
    fn config_path(&self, loaded: &LoadedConfig);
    fn config_show(&self, loaded: &LoadedConfig, rendered: &str);

    // Metadata
    fn version_info(&self, info: &VersionInfo);
}
