//! CLI argument definitions.

use std::path::PathBuf;

use clap::builder::{BoolishValueParser, FalseyValueParser};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};

use crate::focuser::{MotionMode, TemperatureChannel};

/// Drive an FLI USB focuser through libfli.
///
/// Robot Mode: Use --robot or --format=json for machine-parseable output optimized for AI agents.
#[derive(Parser, Debug)]
#[command(name = "flifocus", version, about, long_about = None)]
#[command(propagate_version = true)]
#[allow(clippy::struct_excessive_bools)] // CLI flags naturally use multiple bools
pub struct Cli {
    /// Output format (text for humans, json for agents/scripts)
    #[arg(
        long,
        short = 'f',
        default_value = "text",
        global = true,
        env = "FLIFOCUS_FORMAT"
    )]
    pub format: OutputFormat,

    /// Robot mode: equivalent to --format=json (optimized for AI agents)
    #[arg(long, global = true)]
    pub robot: bool,

    /// Verbose logging (-v debug, -vv trace)
    #[arg(long, short = 'v', global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(
        long,
        global = true,
        env = "NO_COLOR",
        value_parser = FalseyValueParser::new()
    )]
    pub no_color: bool,

    /// Focuser device node (overrides the config file)
    #[arg(long, short = 'd', global = true, env = "FLIFOCUS_DEVICE")]
    pub device: Option<String>,

    /// Configuration file (TOML or YAML)
    #[arg(long, global = true, env = "FLIFOCUS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Use the simulated focuser instead of hardware
    #[arg(
        long,
        global = true,
        env = "FLIFOCUS_SIMULATE",
        value_parser = BoolishValueParser::new()
    )]
    pub simulate: bool,

    /// Also write debug logs to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Output format selection.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text with optional color
    #[default]
    Text,
    /// JSON output for scripts and agents
    Json,
    /// Compact JSON (single line)
    JsonCompact,
}

impl Cli {
    /// Returns true if output should be JSON (robot mode or explicit --format=json).
    pub const fn use_json(&self) -> bool {
        self.robot || matches!(self.format, OutputFormat::Json | OutputFormat::JsonCompact)
    }

    /// Returns true if output should be compact JSON.
    pub const fn use_compact_json(&self) -> bool {
        matches!(self.format, OutputFormat::JsonCompact)
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    // === Motion ===
    /// Move the focuser to an absolute stepper position
    Goto(GotoArgs),

    /// Move the focuser by a relative number of steps
    Step(StepArgs),

    /// Run the focuser homing routine
    Home,

    // === Readings ===
    /// Show model, position, range and temperature
    Status,

    /// Show the current stepper position
    Position,

    /// Read a focuser temperature sensor
    Temperature(TemperatureArgs),

    /// List attached FLI focusers
    List,

    // === Configuration ===
    /// Show the effective configuration
    Config(ConfigArgs),

    // === Utilities ===
    /// Show version and build information
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// === Argument Structs ===

/// How a motion command waits for the motor.
#[derive(clap::Args, Debug, Clone, Copy)]
pub struct MotionArgs {
    /// Return as soon as the motion is commanded
    #[arg(long = "async", conflicts_with = "progress")]
    pub no_wait: bool,

    /// Poll the motor and show progress until it stops
    #[arg(long)]
    pub progress: bool,
}

impl MotionArgs {
    #[must_use]
    pub const fn mode(&self) -> MotionMode {
        if self.no_wait {
            MotionMode::Async
        } else if self.progress {
            MotionMode::Tracked
        } else {
            MotionMode::Blocking
        }
    }
}

#[derive(Parser, Debug)]
pub struct GotoArgs {
    /// Target stepper position
    #[arg(allow_negative_numbers = true)]
    pub position: i64,

    #[command(flatten)]
    pub motion: MotionArgs,
}

#[derive(Parser, Debug)]
pub struct StepArgs {
    /// Steps to move (negative moves toward zero)
    #[arg(allow_negative_numbers = true)]
    pub steps: i64,

    #[command(flatten)]
    pub motion: MotionArgs,
}

#[derive(Parser, Debug)]
pub struct TemperatureArgs {
    /// Sensor to read
    #[arg(long, short = 'c', value_enum, default_value = "internal")]
    pub channel: TemperatureChannel,
}

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Show configuration file path
    #[arg(long)]
    pub path: bool,
}

#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
