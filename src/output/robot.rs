//! Robot mode JSON output implementation.
//!
//! One JSON document per command on stdout; errors go to stderr. Readings
//! taken during a sequence are not streamed, they appear in the final report.

use serde::Serialize;
use tracing::{debug, instrument, trace};

use crate::config::LoadedConfig;
use crate::error::FocusError;
use crate::focuser::sequence::{FocusObserver, GotoReport, HomeReport, MoveReport};
use crate::focuser::{FocuserStatus, ListedFocuser, TemperatureChannel};

use super::{Output, RobotFormat, VersionInfo};

/// JSON output implementation for AI agents and scripting.
pub struct RobotOutput {
    format: RobotFormat,
}

impl RobotOutput {
    #[instrument]
    pub fn new(format: RobotFormat) -> Self {
        debug!(?format, "Creating RobotOutput");
        Self { format }
    }

    /// Output any serializable data as JSON to stdout.
    #[instrument(skip(self, data), fields(format = ?self.format))]
    fn output_json<T: Serialize + ?Sized>(&self, data: &T) {
        let json = match self.format {
            RobotFormat::Json => {
                trace!("Serializing as pretty JSON");
                serde_json::to_string_pretty(data)
            }
            RobotFormat::JsonCompact => {
                trace!("Serializing as compact JSON");
                serde_json::to_string(data)
            }
        };
        match json {
            Ok(json) => {
                trace!(json_len = json.len(), "JSON serialized");
                println!("{json}");
            }
            Err(e) => eprintln!("{{\"error\":true,\"message\":\"serialization failed: {e}\"}}"),
        }
    }

    /// Output pretty JSON to stderr.
    fn output_json_pretty_stderr<T: Serialize>(&self, data: &T) {
        match serde_json::to_string_pretty(data) {
            Ok(json) => eprintln!("{json}"),
            Err(e) => eprintln!("{{\"error\":true,\"message\":\"serialization failed: {e}\"}}"),
        }
    }
}

/// Readings are reported once, in the final document.
impl FocusObserver for RobotOutput {}

impl Output for RobotOutput {
    fn observer(&self) -> &dyn FocusObserver {
        self
    }

    #[instrument(skip(self))]
    fn success(&self, message: &str) {
        debug!(message, "Robot: success");
        self.output_json(&serde_json::json!({
            "success": true,
            "message": message
        }));
    }

    #[instrument(skip(self))]
    fn error(&self, error: &FocusError) {
        debug!(error = %error, "Robot: error");
        self.output_json_pretty_stderr(&serde_json::json!({
            "error": true,
            "message": error.to_string(),
            "suggestion": error.suggestion(),
            "recoverable": error.is_user_recoverable(),
        }));
    }

    #[instrument(skip(self))]
    fn warning(&self, message: &str) {
        debug!(message, "Robot: warning");
        self.output_json(&serde_json::json!({
            "warning": true,
            "message": message
        }));
    }

    #[instrument(skip(self))]
    fn info(&self, message: &str) {
        debug!(message, "Robot: info");
        self.output_json(&serde_json::json!({
            "info": true,
            "message": message
        }));
    }

    fn goto_report(&self, report: &GotoReport) {
        debug!("Robot: goto_report");
        self.output_json(report);
    }

    fn step_report(&self, report: &MoveReport) {
        debug!("Robot: step_report");
        self.output_json(report);
    }

    fn home_report(&self, report: &HomeReport) {
        debug!("Robot: home_report");
        self.output_json(report);
    }

    fn status(&self, status: &FocuserStatus) {
        debug!("Robot: status");
        self.output_json(status);
    }

    fn position_report(&self, device: &str, position: i64) {
        debug!(position, "Robot: position_report");
        self.output_json(&serde_json::json!({
            "device": device,
            "position": position,
        }));
    }

    fn temperature_report(&self, device: &str, channel: TemperatureChannel, celsius: f64) {
        debug!(%channel, celsius, "Robot: temperature_report");
        self.output_json(&serde_json::json!({
            "device": device,
            "channel": channel,
            "temperature_c": celsius,
        }));
    }

    #[instrument(skip(self, focusers), fields(count = focusers.len()))]
    fn focuser_list(&self, focusers: &[ListedFocuser]) {
        debug!("Robot: focuser_list");
        self.output_json(focusers);
    }

    fn config_path(&self, loaded: &LoadedConfig) {
        self.output_json(&serde_json::json!({
            "path": loaded.path.display().to_string(),
            "source": loaded.source,
        }));
    }

    fn config_show(&self, loaded: &LoadedConfig, _rendered: &str) {
        self.output_json(loaded);
    }

    fn version_info(&self, info: &VersionInfo) {
        debug!(version = info.version, "Robot: version_info");
        self.output_json(info);
    }
}
