//! Command sequences run against a focuser.
//!
//! `run_goto` is the open → query → validate → move → verify sequence. The
//! observer sees each reading as soon as it is taken, so partial progress
//! is visible when a later step fails.

use serde::Serialize;
use tracing::{debug, instrument, warn};

use super::motion::{self, Limits, MotionOutcome};
use super::{FocuserOperations, MotionMode, TemperatureChannel, TrackingOptions};
use crate::error::Result;

/// Receives readings while a sequence runs.
///
/// All methods default to no-ops.
pub trait FocusObserver {
    fn model(&self, _model: &str) {}
    fn position(&self, _position: i64) {}
    fn extent(&self, _extent: i64) {}
    fn temperature(&self, _channel: TemperatureChannel, _celsius: f64) {}
    /// Called right before a motion command is sent.
    fn move_started(&self, _from: i64, _delta: i64) {}
    /// Steps remaining out of `total` during tracked motion.
    fn move_progress(&self, _total: i64, _remaining: i64) {}
    /// Called after a tracked motion ends, successfully or not.
    fn move_finished(&self) {}
    fn homing_started(&self) {}
    /// Position read back after the motion.
    fn final_position(&self, _position: i64) {}
}

/// Observer that ignores everything.
pub struct NoopObserver;

impl FocusObserver for NoopObserver {}

/// Parameters shared by `goto` and `step`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MoveOptions {
    pub mode: MotionMode,
    /// Soft upper limit tightening the device extent.
    pub max_position: Option<i64>,
    pub tracking: TrackingOptions,
}

/// Result of a relative or absolute move.
#[derive(Debug, Clone, Serialize)]
pub struct MoveReport {
    pub start_position: i64,
    pub target: i64,
    pub delta: i64,
    pub mode: MotionMode,
    pub limits: Limits,
    /// False only when the motion was commanded asynchronously and not followed.
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_position: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reached: Option<bool>,
}

/// Result of the full `goto` sequence.
#[derive(Debug, Clone, Serialize)]
pub struct GotoReport {
    pub device: String,
    pub model: String,
    pub extent: i64,
    pub temperature_c: f64,
    #[serde(flatten)]
    pub motion: MoveReport,
}

/// Result of homing.
#[derive(Debug, Clone, Serialize)]
pub struct HomeReport {
    pub device: String,
    pub homed: bool,
    pub position: i64,
}

/// Move to an absolute stepper position.
///
/// Order: model, position, extent, range check, internal temperature,
/// relative step by `target - position`, position read-back. Validation
/// happens before the temperature read and before any motion.
#[instrument(skip(focuser, options, observer))]
pub fn run_goto(
    focuser: &dyn FocuserOperations,
    target: i64,
    options: &MoveOptions,
    observer: &dyn FocusObserver,
) -> Result<GotoReport> {
    let model = focuser.model()?;
    observer.model(&model);

    let start = focuser.position()?;
    observer.position(start);

    let extent = focuser.extent()?;
    observer.extent(extent);

    let limits = Limits::new(focuser.lower_limit(), extent, options.max_position);
    limits.check_target(target)?;

    let temperature_c = focuser.temperature(TemperatureChannel::Internal)?;
    observer.temperature(TemperatureChannel::Internal, temperature_c);

    let motion = perform_move(focuser, start, target, limits, options, observer)?;

    Ok(GotoReport {
        device: focuser.info().device.clone(),
        model,
        extent,
        temperature_c,
        motion,
    })
}

/// Move by a relative number of steps.
#[instrument(skip(focuser, options, observer))]
pub fn run_step(
    focuser: &dyn FocuserOperations,
    steps: i64,
    options: &MoveOptions,
    observer: &dyn FocusObserver,
) -> Result<MoveReport> {
    let start = focuser.position()?;
    observer.position(start);

    let extent = focuser.extent()?;
    observer.extent(extent);

    let limits = Limits::new(focuser.lower_limit(), extent, options.max_position);
    let target = limits.check_step(start, steps)?;

    perform_move(focuser, start, target, limits, options, observer)
}

/// Run the homing routine and read back the position.
#[instrument(skip(focuser, observer))]
pub fn run_home(
    focuser: &dyn FocuserOperations,
    observer: &dyn FocusObserver,
) -> Result<HomeReport> {
    observer.homing_started();
    focuser.home()?;
    debug!("Focuser homed");

    let position = focuser.position()?;
    observer.final_position(position);

    Ok(HomeReport {
        device: focuser.info().device.clone(),
        homed: true,
        position,
    })
}

fn perform_move(
    focuser: &dyn FocuserOperations,
    start: i64,
    target: i64,
    limits: Limits,
    options: &MoveOptions,
    observer: &dyn FocusObserver,
) -> Result<MoveReport> {
    let delta = target - start;
    observer.move_started(start, delta);

    let total = delta.abs();
    let outcome = motion::drive(focuser, delta, options.mode, &options.tracking, |remaining| {
        observer.move_progress(total, remaining);
    });
    if options.mode == MotionMode::Tracked {
        observer.move_finished();
    }
    let outcome = outcome?;

    let mut report = MoveReport {
        start_position: start,
        target,
        delta,
        mode: options.mode,
        limits,
        completed: outcome != MotionOutcome::Commanded,
        final_position: None,
        reached: None,
    };

    if outcome == MotionOutcome::Commanded {
        debug!(target, "Motion commanded, not waiting for completion");
        return Ok(report);
    }

    let final_position = focuser.position()?;
    observer.final_position(final_position);

    let reached = final_position == target;
    if !reached {
        warn!(target, final_position, "Focuser did not reach target");
    }
    report.final_position = Some(final_position);
    report.reached = Some(reached);
    Ok(report)
}
