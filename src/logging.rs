//! Structured logging initialization for flifocus.
//!
//! Supports both human-friendly and machine-readable (JSON) output formats,
//! with proper TTY detection and verbosity control, plus an optional
//! plain-text log file.

use std::fs::{File, OpenOptions};
use std::io::{self, IsTerminal};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::error::{FocusError, Result};

/// Filter directive for the file layer.
const FILE_DIRECTIVE: &str = "flifocus=debug";

/// Pick the console filter directive from the verbosity flags.
#[must_use]
pub fn default_directive(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        "flifocus=error"
    } else {
        match verbose {
            0 => "flifocus=info",
            1 => "flifocus=debug",
            _ => "flifocus=trace",
        }
    }
}

fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| FocusError::Other(format!("Cannot open log file {}: {e}", path.display())))
}

/// Initialize the tracing subscriber based on CLI flags and environment.
///
/// # Arguments
///
/// * `robot_mode` - If true, output structured JSON logs for machine consumption
/// * `verbose` - Verbosity level: 0 = info, 1 = debug, 2+ = trace
/// * `quiet` - If true, suppress non-essential output (only errors)
/// * `log_file` - Optional file receiving debug-level logs without color
///
/// # Environment Variables
///
/// * `RUST_LOG` - Override the console filter (e.g., "flifocus=debug")
///
/// # Output Behavior
///
/// | Mode | TTY | Output |
/// |------|-----|--------|
/// | Robot | any | JSON lines to stderr |
/// | Human | yes | Pretty colored output to stderr |
/// | Human | no | Compact plain output to stderr |
pub fn init_logging(
    robot_mode: bool,
    verbose: u8,
    quiet: bool,
    log_file: Option<&Path>,
) -> Result<()> {
    // Allow RUST_LOG to override, but use our default otherwise
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, quiet)));

    let console_layer = if robot_mode {
        // JSON output for AI agents and scripts
        fmt::layer()
            .json()
            .with_target(true)
            .with_file(false)
            .with_line_number(false)
            .with_thread_ids(false)
            .with_span_events(FmtSpan::NONE)
            .with_writer(io::stderr)
            .with_filter(filter)
            .boxed()
    } else if io::stderr().is_terminal() {
        // Pretty output for interactive terminals
        fmt::layer()
            .with_target(false)
            .with_file(false)
            .with_line_number(false)
            .with_thread_ids(false)
            .with_span_events(FmtSpan::NONE)
            .with_writer(io::stderr)
            .with_filter(filter)
            .boxed()
    } else {
        // Compact output for non-TTY (piped, redirected)
        fmt::layer()
            .with_ansi(false)
            .with_target(false)
            .with_file(false)
            .with_line_number(false)
            .with_thread_ids(false)
            .with_span_events(FmtSpan::NONE)
            .compact()
            .with_writer(io::stderr)
            .with_filter(filter)
            .boxed()
    };

    let file_layer = match log_file {
        Some(path) => {
            let file = open_log_file(path)?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(true)
                    .with_writer(Mutex::new(file))
                    .with_filter(EnvFilter::new(FILE_DIRECTIVE)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| FocusError::Other(format!("Failed to initialize logging: {e}")))
}
