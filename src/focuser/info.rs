//! Information and option types for focuser devices.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::Serialize;

/// Default device node created by the fliusb kernel driver.
pub const DEFAULT_DEVICE_PATH: &str = "/dev/fliusb0";

/// Lowest valid stepper position. The hardware has no query for it.
pub const LOWER_LIMIT: i64 = 0;

/// Which implementation is driving the focuser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Vendor library bound over FFI.
    Libfli,
    /// In-memory focuser.
    Simulated,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Libfli => f.write_str("libfli"),
            Self::Simulated => f.write_str("simulated"),
        }
    }
}

/// Information about an opened focuser, gathered once at open time.
#[derive(Debug, Clone, Serialize)]
pub struct FocuserInfo {
    /// Device node the focuser was opened from
    pub device: String,
    /// Serial number, "unknown" if the device does not report one
    pub serial: String,
    /// Firmware revision
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firmware_revision: Option<i64>,
    /// Hardware revision
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hardware_revision: Option<i64>,
    /// Backend driving the device
    pub backend: BackendKind,
}

/// A focuser found while enumerating the USB focuser domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListedFocuser {
    /// Device node to pass to `--device`
    pub file_name: String,
    /// Device name reported by the vendor library
    pub name: String,
}

/// Temperature sensor channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureChannel {
    /// Sensor inside the focuser body
    #[default]
    Internal,
    /// External probe
    External,
}

impl TemperatureChannel {
    /// Short label used in console output ("T_int", "T_ext").
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Internal => "T_int",
            Self::External => "T_ext",
        }
    }
}

impl fmt::Display for TemperatureChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Internal => f.write_str("internal"),
            Self::External => f.write_str("external"),
        }
    }
}

/// How a motion command is issued and followed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionMode {
    /// Block in the vendor call until motion completes.
    #[default]
    Blocking,
    /// Command the motion and return immediately.
    Async,
    /// Command the motion asynchronously and poll until it completes.
    Tracked,
}

/// Polling settings for tracked motion.
#[derive(Debug, Clone, Copy)]
pub struct TrackingOptions {
    /// Delay between `steps_remaining` polls.
    pub poll_interval: Duration,
    /// Give up after this long.
    pub timeout: Duration,
}

impl Default for TrackingOptions {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(100),
            timeout: Duration::from_secs(120),
        }
    }
}

/// Snapshot of everything `status` reports.
#[derive(Debug, Clone, Serialize)]
pub struct FocuserStatus {
    pub device: String,
    pub model: String,
    pub serial: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firmware_revision: Option<i64>,
    pub backend: BackendKind,
    pub position: i64,
    pub extent: i64,
    pub lower_limit: i64,
    pub upper_limit: i64,
    pub temperature_c: f64,
    pub steps_remaining: i64,
    /// When the readings were taken.
    pub read_at: DateTime<Utc>,
}

/// Connection retry options for opening devices.
#[derive(Debug, Clone)]
pub struct ConnectionOptions {
    /// Maximum number of connection attempts (default: 1).
    pub max_retries: u32,
    /// Initial delay between retries (default: 1000ms).
    pub retry_delay: Duration,
    /// Exponential backoff factor (default: 1.5).
    pub backoff_factor: f32,
    /// Maximum delay cap (default: 10000ms).
    pub max_delay: Duration,
}

impl Default for ConnectionOptions {
    fn default() -> Self {
        Self {
            max_retries: 1,
            retry_delay: Duration::from_millis(1000),
            backoff_factor: 1.5,
            max_delay: Duration::from_millis(10000),
        }
    }
}
