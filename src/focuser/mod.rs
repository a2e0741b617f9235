//! Focuser abstraction layer.
//!
//! This module provides a trait-based abstraction over the vendor-library
//! backend and the in-memory focuser, so every command can run without
//! hardware in tests.

#[cfg(feature = "libfli")]
mod ffi;
#[cfg(feature = "libfli")]
mod fli;
mod info;
pub mod mock;
pub mod motion;
pub mod sequence;

pub use info::{
    BackendKind, ConnectionOptions, DEFAULT_DEVICE_PATH, FocuserInfo, FocuserStatus, LOWER_LIMIT,
    ListedFocuser, MotionMode, TemperatureChannel, TrackingOptions,
};
pub use mock::{MockFocuser, MockFocuserBuilder};

use std::time::Duration;

use tracing::{debug, error, trace, warn};

use crate::error::Result;

/// Core focuser operations trait.
///
/// Each method maps to exactly one query or command on the device.
/// Positions and step counts are in motor steps.
pub trait FocuserOperations {
    /// Information gathered when the device was opened.
    fn info(&self) -> &FocuserInfo;

    /// Query the model string.
    fn model(&self) -> Result<String>;

    /// Query the current stepper position.
    fn position(&self) -> Result<i64>;

    /// Query the maximum stepper position.
    fn extent(&self) -> Result<i64>;

    /// Read a temperature channel in degrees Celsius.
    fn temperature(&self, channel: TemperatureChannel) -> Result<f64>;

    /// Step the motor relative to the current position, blocking until done.
    fn step(&self, steps: i64) -> Result<()>;

    /// Step the motor relative to the current position without waiting.
    fn step_async(&self, steps: i64) -> Result<()>;

    /// Steps left in a motion started by [`step_async`](Self::step_async).
    fn steps_remaining(&self) -> Result<i64>;

    /// Run the homing routine.
    fn home(&self) -> Result<()>;

    /// Lowest valid stepper position.
    fn lower_limit(&self) -> i64 {
        LOWER_LIMIT
    }
}

/// Type alias for boxed trait object.
pub type BoxedFocuser = Box<dyn FocuserOperations>;

/// Where to get a focuser from.
#[derive(Debug, Clone)]
pub enum FocuserSource {
    /// Open a device node through the vendor library.
    Hardware { device: String },
    /// Build an in-memory focuser.
    Simulated(MockFocuserBuilder),
}

impl FocuserSource {
    /// Device path this source refers to.
    #[must_use]
    pub fn device(&self) -> &str {
        match self {
            Self::Hardware { device } => device,
            Self::Simulated(builder) => builder.device(),
        }
    }
}

/// Open a focuser and return it as a boxed trait object.
///
/// # Errors
///
/// Returns an error if the device cannot be opened, or if hardware is
/// requested from a build without the `libfli` feature.
pub fn open_focuser(source: &FocuserSource) -> Result<BoxedFocuser> {
    match source {
        FocuserSource::Simulated(builder) => {
            debug!(device = builder.device(), "Opening simulated focuser");
            Ok(Box::new(builder.clone().build()))
        }
        FocuserSource::Hardware { device } => open_hardware(device),
    }
}

#[cfg(feature = "libfli")]
fn open_hardware(device: &str) -> Result<BoxedFocuser> {
    Ok(Box::new(fli::FliFocuser::open(device)?))
}

#[cfg(not(feature = "libfli"))]
fn open_hardware(device: &str) -> Result<BoxedFocuser> {
    warn!(device, "Hardware focuser requested but libfli support is not compiled in");
    Err(crate::error::FocusError::BackendUnavailable)
}

/// Open a focuser with retry/backoff options.
///
/// Only connection-class errors are retried.
pub fn open_focuser_with_retry(
    source: &FocuserSource,
    opts: &ConnectionOptions,
) -> Result<BoxedFocuser> {
    retry_open(source.device(), opts, || open_focuser(source))
}

fn retry_open<T>(
    device: &str,
    opts: &ConnectionOptions,
    mut open: impl FnMut() -> Result<T>,
) -> Result<T> {
    let max_retries = opts.max_retries.max(1);
    let mut delay = opts.retry_delay;
    let mut attempt = 1;

    loop {
        trace!(attempt, max_retries, "Retry loop iteration");
        debug!(attempt, max_retries, device, "Opening focuser");
        match open() {
            Ok(focuser) => {
                debug!(attempt, device, "Focuser opened");
                return Ok(focuser);
            }
            Err(err) if err.is_connection_error() && attempt < max_retries => {
                warn!(
                    attempt,
                    max_retries,
                    error = %err,
                    delay_ms = delay.as_millis(),
                    "Open failed, retrying"
                );
                std::thread::sleep(delay);
                delay = next_delay(delay, opts);
                attempt += 1;
            }
            Err(err) => {
                error!(attempt, max_retries, error = %err, "Open failed");
                return Err(err);
            }
        }
    }
}

/// Grow a retry delay by the backoff factor, capped at `max_delay`.
fn next_delay(delay: Duration, opts: &ConnectionOptions) -> Duration {
    delay
        .mul_f64(f64::from(opts.backoff_factor))
        .min(opts.max_delay)
}

/// Enumerate attached focusers.
///
/// A simulated source lists only itself.
pub fn list_focusers(source: &FocuserSource) -> Result<Vec<ListedFocuser>> {
    match source {
        FocuserSource::Simulated(builder) => Ok(vec![ListedFocuser {
            file_name: builder.device().to_string(),
            name: builder.model().to_string(),
        }]),
        FocuserSource::Hardware { .. } => list_hardware(),
    }
}

#[cfg(feature = "libfli")]
fn list_hardware() -> Result<Vec<ListedFocuser>> {
    fli::list_devices()
}

#[cfg(not(feature = "libfli"))]
fn list_hardware() -> Result<Vec<ListedFocuser>> {
    Err(crate::error::FocusError::BackendUnavailable)
}

/// Version string of the vendor library, when it is linked in.
pub fn library_version() -> Option<String> {
    #[cfg(feature = "libfli")]
    {
        fli::library_version().ok()
    }
    #[cfg(not(feature = "libfli"))]
    {
        None
    }
}

/// Gather a full status snapshot.
///
/// `max_position` is an optional soft limit that tightens the device extent.
pub fn read_status(
    focuser: &dyn FocuserOperations,
    max_position: Option<i64>,
) -> Result<FocuserStatus> {
    let info = focuser.info();
    let model = focuser.model()?;
    let position = focuser.position()?;
    let extent = focuser.extent()?;
    let limits = motion::Limits::new(focuser.lower_limit(), extent, max_position);
    let temperature_c = focuser.temperature(TemperatureChannel::Internal)?;
    let steps_remaining = focuser.steps_remaining()?;

    Ok(FocuserStatus {
        device: info.device.clone(),
        model,
        serial: info.serial.clone(),
        firmware_revision: info.firmware_revision,
        backend: info.backend,
        position,
        extent,
        lower_limit: limits.lower,
        upper_limit: limits.upper,
        temperature_c,
        steps_remaining,
        read_at: chrono::Utc::now(),
    })
}
