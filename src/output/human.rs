//! Human-friendly output implementation.
//!
//! Readings are printed in the classic `FLI ...` line format as soon as
//! they are taken, so a failure part-way through still shows what was read.

use std::cell::RefCell;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, instrument, trace};

use crate::config::{ConfigSource, LoadedConfig};
use crate::error::FocusError;
use crate::focuser::sequence::{FocusObserver, GotoReport, HomeReport, MoveReport};
use crate::focuser::{FocuserStatus, ListedFocuser, TemperatureChannel};
use crate::theme::FocusTheme;

use super::{Output, VersionInfo};

/// Styled terminal output implementation for human users.
pub struct HumanOutput {
    theme: FocusTheme,
    quiet: bool,
    progress: RefCell<Option<ProgressBar>>,
}

impl HumanOutput {
    #[instrument]
    pub fn new(color: bool, quiet: bool) -> Self {
        debug!("Creating HumanOutput");
        Self {
            theme: if color {
                FocusTheme::default()
            } else {
                FocusTheme::plain()
            },
            quiet,
            progress: RefCell::new(None),
        }
    }

    /// Print a reading line unless quiet.
    fn reading(&self, line: &str) {
        if !self.quiet {
            println!("{line}");
        }
    }

    fn labeled(&self, label: &str, value: &str) {
        println!(
            "  {} {}",
            self.theme.label.apply_to(format!("{label:<18}")),
            self.theme.value.apply_to(value)
        );
    }

    fn report_motion(&self, report: &MoveReport) {
        if !report.completed {
            self.info(&format!(
                "Motion commanded; focuser moving to {}",
                report.target
            ));
            return;
        }
        if report.reached == Some(false) {
            if let Some(actual) = report.final_position {
                self.warning(&format!(
                    "Focuser stopped at {actual}, target was {}",
                    report.target
                ));
            }
        }
    }

    fn progress_bar(total: i64) -> ProgressBar {
        let bar = ProgressBar::new(total.unsigned_abs());
        if let Ok(style) = ProgressStyle::with_template(
            "  {spinner} [{bar:30}] {pos}/{len} steps ({elapsed})",
        ) {
            bar.set_style(style.progress_chars("=> "));
        }
        bar
    }
}

/// Vendor failures already read "Error opening ..." and need no label.
fn has_error_prefix(message: &str) -> bool {
    message.starts_with("Error ")
}

impl FocusObserver for HumanOutput {
    fn model(&self, model: &str) {
        self.reading(&format!("FLI model: {model}"));
    }

    fn position(&self, position: i64) {
        self.reading(&format!("FLI stepper position: {position}"));
    }

    fn extent(&self, extent: i64) {
        self.reading(&format!("FLI maximum stepper position: {extent}"));
    }

    fn temperature(&self, channel: TemperatureChannel, celsius: f64) {
        self.reading(&format!("FLI {}: {celsius:.2}", channel.label()));
    }

    fn move_started(&self, _from: i64, delta: i64) {
        self.reading("");
        self.reading(&format!("Moving {delta} steps..."));
    }

    fn move_progress(&self, total: i64, remaining: i64) {
        if self.quiet {
            return;
        }
        let mut slot = self.progress.borrow_mut();
        let bar = slot.get_or_insert_with(|| Self::progress_bar(total));
        bar.set_position((total - remaining).unsigned_abs());
        trace!(total, remaining, "Progress updated");
    }

    fn move_finished(&self) {
        if let Some(bar) = self.progress.borrow_mut().take() {
            bar.finish_and_clear();
        }
    }

    fn homing_started(&self) {
        self.reading("Homing FLI focuser...");
    }

    fn final_position(&self, position: i64) {
        // Always shown, even when quiet: this is the command's answer.
        println!(
            "FLI stepper position: {}",
            self.theme.position.apply_to(position)
        );
    }
}

impl Output for HumanOutput {
    fn observer(&self) -> &dyn FocusObserver {
        self
    }

    #[instrument(skip(self))]
    fn success(&self, message: &str) {
        if self.quiet {
            return;
        }
        println!("{} {message}", self.theme.success.apply_to("[OK]"));
    }

    #[instrument(skip(self))]
    fn error(&self, error: &FocusError) {
        debug!(
            error = %error,
            recoverable = error.is_user_recoverable(),
            "Outputting error"
        );
        let message = error.to_string();
        if has_error_prefix(&message) {
            eprintln!("{message}");
        } else {
            let label = self.theme.error.clone().for_stderr();
            eprintln!("{}: {message}", label.apply_to("Error"));
        }
        if let Some(suggestion) = error.suggestion() {
            let hint = self.theme.warning.clone().for_stderr();
            eprintln!("{}: {suggestion}", hint.apply_to("Hint"));
        }
    }

    #[instrument(skip(self))]
    fn warning(&self, message: &str) {
        println!("{} {message}", self.theme.warning.apply_to("[WARN]"));
    }

    #[instrument(skip(self))]
    fn info(&self, message: &str) {
        if self.quiet {
            return;
        }
        println!("{} {message}", self.theme.accent.apply_to("[INFO]"));
    }

    fn goto_report(&self, report: &GotoReport) {
        debug!(target = report.motion.target, "Outputting goto report");
        self.report_motion(&report.motion);
    }

    fn step_report(&self, report: &MoveReport) {
        debug!(target = report.target, "Outputting step report");
        self.report_motion(report);
    }

    fn home_report(&self, report: &HomeReport) {
        debug!(position = report.position, "Outputting home report");
        self.success("FLI focuser homed");
    }

    #[instrument(skip(self, status), fields(device = %status.device))]
    fn status(&self, status: &FocuserStatus) {
        debug!("Outputting status");
        println!("{}", self.theme.header.apply_to(&status.model));
        println!(
            "  {} {}",
            self.theme.label.apply_to(format!("{:<18}", "Device")),
            self.theme.device.apply_to(&status.device)
        );
        self.labeled("Serial", &status.serial);
        if let Some(fw) = status.firmware_revision {
            self.labeled("Firmware", &format!("0x{fw:04x}"));
        }
        self.labeled("Backend", &status.backend.to_string());
        self.labeled("Position", &status.position.to_string());
        self.labeled(
            "Range",
            &format!("{}..={}", status.lower_limit, status.upper_limit),
        );
        if status.upper_limit != status.extent {
            self.labeled("Extent", &status.extent.to_string());
        }
        self.labeled("T_int (C)", &format!("{:.2}", status.temperature_c));
        if status.steps_remaining != 0 {
            self.labeled("Steps remaining", &status.steps_remaining.to_string());
        }
        self.labeled(
            "Read at",
            &status.read_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        );
    }

    fn position_report(&self, _device: &str, position: i64) {
        self.final_position(position);
    }

    fn temperature_report(&self, _device: &str, channel: TemperatureChannel, celsius: f64) {
        println!("FLI {}: {celsius:.2}", channel.label());
    }

    #[instrument(skip(self, focusers), fields(count = focusers.len()))]
    fn focuser_list(&self, focusers: &[ListedFocuser]) {
        if focusers.is_empty() {
            self.warning("No FLI focusers found");
            return;
        }
        for focuser in focusers {
            println!(
                "{}: {}",
                self.theme.device.apply_to(&focuser.file_name),
                focuser.name
            );
        }
    }

    fn config_path(&self, loaded: &LoadedConfig) {
        println!("{}", loaded.path.display());
    }

    fn config_show(&self, loaded: &LoadedConfig, rendered: &str) {
        let origin = match loaded.source {
            ConfigSource::File => loaded.path.display().to_string(),
            ConfigSource::Defaults => format!("defaults ({} not found)", loaded.path.display()),
        };
        println!("{}", self.theme.muted.apply_to(format!("# {origin}")));
        print!("{rendered}");
    }

    fn version_info(&self, info: &VersionInfo) {
        println!("flifocus {}", info.version);
        println!(
            "git: {}{}",
            info.git_sha,
            if info.git_dirty { " (dirty)" } else { "" }
        );
        println!("built: {}", info.build_timestamp);
        println!("rustc: {}", info.rustc_version);
        println!("target: {}", info.target);
        match &info.libfli_version {
            Some(version) => println!("libfli: {version}"),
            None if info.hardware_backend => println!("libfli: linked"),
            None => println!("libfli: not compiled in (simulation only)"),
        }
    }
}
