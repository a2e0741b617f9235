//! Range checks and motion execution.

use std::time::Instant;

use serde::Serialize;
use tracing::{debug, instrument, trace, warn};

use super::{FocuserOperations, MotionMode, TrackingOptions};
use crate::error::{FocusError, Result};

/// Valid stepper-position range, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Limits {
    pub lower: i64,
    pub upper: i64,
}

impl Limits {
    /// Build limits from the device extent and an optional soft maximum.
    ///
    /// The soft maximum can only tighten the extent, never widen it.
    #[must_use]
    pub fn new(lower: i64, extent: i64, max_position: Option<i64>) -> Self {
        let upper = max_position.map_or(extent, |max| max.min(extent));
        Self { lower, upper }
    }

    #[must_use]
    pub const fn contains(&self, position: i64) -> bool {
        position >= self.lower && position <= self.upper
    }

    /// Check an absolute target position.
    pub fn check_target(&self, target: i64) -> Result<()> {
        if self.contains(target) {
            Ok(())
        } else {
            Err(FocusError::PositionOutOfRange {
                target,
                min: self.lower,
                max: self.upper,
            })
        }
    }

    /// Check a relative move from `now` and return the resulting position.
    pub fn check_step(&self, now: i64, steps: i64) -> Result<i64> {
        let target = now.saturating_add(steps);
        if self.contains(target) {
            Ok(target)
        } else {
            Err(FocusError::StepOutOfRange {
                target,
                min: self.lower,
                max: self.upper,
            })
        }
    }
}

/// Outcome of issuing a motion command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionOutcome {
    /// Nothing was sent because the delta was zero.
    Skipped,
    /// The motion finished (blocking or tracked).
    Completed,
    /// The motion was commanded and is still running.
    Commanded,
}

/// Issue a relative motion in the requested mode.
///
/// `on_progress` receives the steps remaining while a tracked motion runs.
#[instrument(skip(focuser, tracking, on_progress))]
pub fn drive<F>(
    focuser: &dyn FocuserOperations,
    delta: i64,
    mode: MotionMode,
    tracking: &TrackingOptions,
    on_progress: F,
) -> Result<MotionOutcome>
where
    F: FnMut(i64),
{
    if delta == 0 {
        debug!("Focuser already at target, no motion commanded");
        return Ok(MotionOutcome::Skipped);
    }

    match mode {
        MotionMode::Blocking => {
            debug!(delta, "Stepping focuser (blocking)");
            focuser.step(delta)?;
            Ok(MotionOutcome::Completed)
        }
        MotionMode::Async => {
            debug!(delta, "Stepping focuser (async)");
            focuser.step_async(delta)?;
            Ok(MotionOutcome::Commanded)
        }
        MotionMode::Tracked => {
            debug!(delta, "Stepping focuser (tracked)");
            focuser.step_async(delta)?;
            wait_for_motion(focuser, tracking, on_progress)?;
            Ok(MotionOutcome::Completed)
        }
    }
}

/// Poll `steps_remaining` until it reaches zero or the timeout expires.
pub fn wait_for_motion<F>(
    focuser: &dyn FocuserOperations,
    tracking: &TrackingOptions,
    mut on_progress: F,
) -> Result<()>
where
    F: FnMut(i64),
{
    let start = Instant::now();

    loop {
        let remaining = focuser.steps_remaining()?;
        trace!(remaining, elapsed_ms = start.elapsed().as_millis(), "Motion poll");
        on_progress(remaining);

        if remaining == 0 {
            debug!(elapsed_ms = start.elapsed().as_millis(), "Motion complete");
            return Ok(());
        }

        if start.elapsed() >= tracking.timeout {
            warn!(remaining, "Motion timed out");
            return Err(FocusError::MotionTimeout {
                timeout_secs: tracking.timeout.as_secs(),
                remaining,
            });
        }

        std::thread::sleep(tracking.poll_interval);
    }
}
