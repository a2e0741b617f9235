//! flifocus - drive an FLI USB focuser from the command line.
//!
//! Provides both human-friendly and agent-friendly (robot mode) interfaces.

use std::io;

use clap::Parser;
use console::style;
use serde::Serialize;
use tracing::debug;

use flifocus::cli::{self, Cli, Commands};
use flifocus::config::{self, Config, LoadedConfig};
use flifocus::error::{FocusError, Result};
use flifocus::focuser::sequence::{self, MoveOptions};
use flifocus::focuser::{self, BoxedFocuser, FocuserSource, MotionMode};
use flifocus::logging;
use flifocus::output::{Output, OutputMode, VersionInfo};

/// Build information embedded at compile time.
mod build_info {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");

    pub fn git_sha() -> &'static str {
        option_env!("VERGEN_GIT_SHA").unwrap_or("unknown")
    }

    pub fn git_dirty() -> &'static str {
        option_env!("VERGEN_GIT_DIRTY").unwrap_or("false")
    }

    pub fn build_timestamp() -> &'static str {
        option_env!("VERGEN_BUILD_TIMESTAMP").unwrap_or("unknown")
    }

    pub fn rustc_semver() -> &'static str {
        option_env!("VERGEN_RUSTC_SEMVER").unwrap_or("unknown")
    }

    pub fn target() -> &'static str {
        option_env!("VERGEN_CARGO_TARGET_TRIPLE").unwrap_or("unknown")
    }
}

fn main() {
    let cli = Cli::parse();

    // console already disables styling when stdout is not a terminal
    if cli.no_color {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }

    let output = OutputMode::from_cli(&cli).into_output();

    // Run the command
    if let Err(e) = run(&cli, output.as_ref()) {
        output.error(&e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli, output: &dyn Output) -> Result<()> {
    match &cli.command {
        None => print_quick_start(cli),
        Some(Commands::Goto(args)) => cmd_goto(cli, output, args),
        Some(Commands::Step(args)) => cmd_step(cli, output, args),
        Some(Commands::Home) => cmd_home(cli, output),
        Some(Commands::Status) => cmd_status(cli, output),
        Some(Commands::Position) => cmd_position(cli, output),
        Some(Commands::Temperature(args)) => cmd_temperature(cli, output, args),
        Some(Commands::List) => cmd_list(cli, output),
        Some(Commands::Config(args)) => cmd_config(cli, output, args),
        Some(Commands::Version) => cmd_version(output),
        Some(Commands::Completions(args)) => cmd_completions(args),
    }
}

// === Session ===

/// Loaded configuration plus the focuser it points at.
struct Session {
    loaded: LoadedConfig,
    source: FocuserSource,
}

impl Session {
    /// Load configuration, start logging and resolve the focuser source.
    ///
    /// Command-line flags win over config values.
    fn start(cli: &Cli) -> Result<Self> {
        let loaded = config::load(cli.config.as_deref())?;

        let log_file = match &cli.log_file {
            Some(path) => Some(config::expand_home(path)?),
            None => loaded.config.log_file.clone(),
        };
        logging::init_logging(cli.use_json(), cli.verbose, cli.quiet, log_file.as_deref())?;
        debug!(
            path = %loaded.path.display(),
            source = ?loaded.source,
            "Configuration loaded"
        );

        let device = cli
            .device
            .clone()
            .unwrap_or_else(|| loaded.config.device.clone());
        let source = if cli.simulate {
            debug!(device = %device, "Using simulated focuser");
            FocuserSource::Simulated(loaded.config.simulator_builder(&device))
        } else {
            FocuserSource::Hardware { device }
        };

        Ok(Self { loaded, source })
    }

    const fn config(&self) -> &Config {
        &self.loaded.config
    }

    fn open(&self) -> Result<BoxedFocuser> {
        focuser::open_focuser_with_retry(&self.source, &self.config().connection_options())
    }

    fn move_options(&self, mode: MotionMode) -> MoveOptions {
        MoveOptions {
            mode,
            max_position: self.config().limits.max_position,
            tracking: self.config().tracking_options(),
        }
    }
}

// === Quick Start (Robot Mode Optimized) ===

/// Prints quick-start help optimized for both humans and AI agents.
fn print_quick_start(cli: &Cli) -> Result<()> {
    if cli.use_json() {
        print_robot_quick_start()?;
    } else {
        print_human_quick_start();
    }
    Ok(())
}

fn print_robot_quick_start() -> Result<()> {
    let help = RobotQuickStart {
        tool: "flifocus",
        version: build_info::VERSION,
        description: "FLI USB focuser control with robot mode for AI agents",
        readings: RobotReadings {
            status: "flifocus status --robot",
            position: "flifocus position --robot",
            temperature: "flifocus temperature --channel internal --robot",
            list_devices: "flifocus list --robot",
        },
        motion: RobotMotion {
            goto: "flifocus goto <POSITION>",
            step: "flifocus step <STEPS>",
            home: "flifocus home",
            no_wait: "flifocus goto <POSITION> --async",
            with_progress: "flifocus goto <POSITION> --progress",
        },
        range: "Positions run from 0 to the focuser extent reported by status",
        output_modes: OutputModes {
            human: "--format=text (default)",
            robot: "--robot or --format=json",
            compact: "--format=json-compact",
        },
        device: "Use --device <PATH> (default /dev/fliusb0) or --simulate without hardware",
    };

    let json = serde_json::to_string_pretty(&help)
        .map_err(|e| FocusError::Other(e.to_string()))?;
    println!("{json}");
    Ok(())
}

fn print_human_quick_start() {
    println!(
        "{} {} - FLI focuser CLI\n",
        style("flifocus").bold().cyan(),
        build_info::VERSION
    );

    println!("{}", style("QUICK START").bold().underlined());
    println!();

    println!("  {}  Model, position, range, temperature", style("flifocus status").green());
    println!("  {}  Move to stepper position 3500", style("flifocus goto 3500").green());
    println!("  {}  Move 100 steps inward", style("flifocus step -100").green());
    println!("  {}  Run the homing routine", style("flifocus home").green());
    println!("  {}  List attached focusers", style("flifocus list").green());
    println!();

    println!("{}", style("ROBOT MODE (for AI agents)").bold().underlined());
    println!();
    println!("  {}  JSON output", style("flifocus --robot <command>").cyan());
    println!("  {}  Quick-start JSON", style("flifocus --robot").cyan());
    println!();

    println!("{}", style("NO HARDWARE?").bold().underlined());
    println!();
    println!("  {}  Simulated focuser", style("flifocus --simulate status").cyan());
    println!();

    println!("Run {} for full help", style("flifocus --help").yellow());
}

// === Robot Mode JSON Structures ===

#[derive(Serialize)]
struct RobotQuickStart {
    tool: &'static str,
    version: &'static str,
    description: &'static str,
    readings: RobotReadings,
    motion: RobotMotion,
    range: &'static str,
    output_modes: OutputModes,
    device: &'static str,
}

#[derive(Serialize)]
struct RobotReadings {
    status: &'static str,
    position: &'static str,
    temperature: &'static str,
    list_devices: &'static str,
}

#[derive(Serialize)]
struct RobotMotion {
    goto: &'static str,
    step: &'static str,
    home: &'static str,
    no_wait: &'static str,
    with_progress: &'static str,
}

#[derive(Serialize)]
struct OutputModes {
    human: &'static str,
    robot: &'static str,
    compact: &'static str,
}

// === Command Implementations ===

fn cmd_goto(cli: &Cli, output: &dyn Output, args: &cli::GotoArgs) -> Result<()> {
    let session = Session::start(cli)?;
    let focuser = session.open()?;
    let options = session.move_options(args.motion.mode());

    let report = sequence::run_goto(
        focuser.as_ref(),
        args.position,
        &options,
        output.observer(),
    )?;
    output.goto_report(&report);
    Ok(())
}

fn cmd_step(cli: &Cli, output: &dyn Output, args: &cli::StepArgs) -> Result<()> {
    let session = Session::start(cli)?;
    let focuser = session.open()?;
    let options = session.move_options(args.motion.mode());

    let report = sequence::run_step(focuser.as_ref(), args.steps, &options, output.observer())?;
    output.step_report(&report);
    Ok(())
}

fn cmd_home(cli: &Cli, output: &dyn Output) -> Result<()> {
    let session = Session::start(cli)?;
    let focuser = session.open()?;

    let report = sequence::run_home(focuser.as_ref(), output.observer())?;
    output.home_report(&report);
    Ok(())
}

fn cmd_status(cli: &Cli, output: &dyn Output) -> Result<()> {
    let session = Session::start(cli)?;
    let focuser = session.open()?;

    let status = focuser::read_status(focuser.as_ref(), session.config().limits.max_position)?;
    output.status(&status);
    Ok(())
}

fn cmd_position(cli: &Cli, output: &dyn Output) -> Result<()> {
    let session = Session::start(cli)?;
    let focuser = session.open()?;

    let position = focuser.position()?;
    output.position_report(&focuser.info().device, position);
    Ok(())
}

fn cmd_temperature(cli: &Cli, output: &dyn Output, args: &cli::TemperatureArgs) -> Result<()> {
    let session = Session::start(cli)?;
    let focuser = session.open()?;

    let celsius = focuser.temperature(args.channel)?;
    output.temperature_report(&focuser.info().device, args.channel, celsius);
    Ok(())
}

fn cmd_list(cli: &Cli, output: &dyn Output) -> Result<()> {
    let session = Session::start(cli)?;
    let focusers = focuser::list_focusers(&session.source)?;
    output.focuser_list(&focusers);
    Ok(())
}

fn cmd_config(cli: &Cli, output: &dyn Output, args: &cli::ConfigArgs) -> Result<()> {
    let session = Session::start(cli)?;
    if args.path {
        output.config_path(&session.loaded);
    } else {
        let rendered = config::to_toml(session.config())?;
        output.config_show(&session.loaded, &rendered);
    }
    Ok(())
}

#[allow(clippy::unnecessary_wraps)] // Consistent return type with other commands
fn cmd_version(output: &dyn Output) -> Result<()> {
    output.version_info(&VersionInfo {
        version: build_info::VERSION,
        git_sha: build_info::git_sha(),
        git_dirty: build_info::git_dirty() == "true",
        build_timestamp: build_info::build_timestamp(),
        rustc_version: build_info::rustc_semver(),
        target: build_info::target(),
        hardware_backend: cfg!(feature = "libfli"),
        libfli_version: focuser::library_version(),
    });
    Ok(())
}

#[allow(clippy::unnecessary_wraps)] // Consistent return type with other commands
fn cmd_completions(args: &cli::CompletionsArgs) -> Result<()> {
    use clap::CommandFactory;
    clap_complete::generate(args.shell, &mut Cli::command(), "flifocus", &mut io::stdout());
    Ok(())
}
