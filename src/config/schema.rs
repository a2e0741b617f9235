//! Configuration file schema.
//!
//! Every field has a default, so an empty file (or no file at all) is a
//! valid configuration.
//!
//! # Example TOML
//!
//! ```toml
//! device = "/dev/fliusb0"
//! log_file = "~/flifocus.log"
//!
//! [limits]
//! max_position = 7000
//!
//! [connection]
//! retries = 3
//! retry_delay_ms = 500
//!
//! [motion]
//! poll_interval_ms = 100
//! timeout_secs = 120
//!
//! [simulator]
//! position = 3500
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{FocusError, Result};
use crate::focuser::{
    ConnectionOptions, DEFAULT_DEVICE_PATH, MockFocuserBuilder, TrackingOptions,
};

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Device node of the focuser.
    pub device: String,
    /// Optional log file receiving debug-level logs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
    pub limits: LimitsConfig,
    pub connection: ConnectionConfig,
    pub motion: MotionConfig,
    pub simulator: SimulatorConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            device: DEFAULT_DEVICE_PATH.to_string(),
            log_file: None,
            limits: LimitsConfig::default(),
            connection: ConnectionConfig::default(),
            motion: MotionConfig::default(),
            simulator: SimulatorConfig::default(),
        }
    }
}

/// Soft position limits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct LimitsConfig {
    /// Upper bound tighter than the device extent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_position: Option<i64>,
}

/// Open retry settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConnectionConfig {
    pub retries: u32,
    pub retry_delay_ms: u64,
    pub backoff_factor: f32,
    pub max_delay_ms: u64,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            retries: 1,
            retry_delay_ms: 1000,
            backoff_factor: 1.5,
            max_delay_ms: 10_000,
        }
    }
}

/// Tracked-motion polling.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct MotionConfig {
    pub poll_interval_ms: u64,
    pub timeout_secs: u64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 100,
            timeout_secs: 120,
        }
    }
}

/// Initial state of the `--simulate` focuser.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulatorConfig {
    pub model: String,
    pub serial: String,
    pub position: i64,
    pub extent: i64,
    pub temperature: f64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            model: "Simulated Focuser".to_string(),
            serial: "SIM-0001".to_string(),
            position: 0,
            extent: 7000,
            temperature: 20.0,
        }
    }
}

impl Config {
    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.device.trim().is_empty() {
            return Err(FocusError::ConfigInvalid("device must not be empty".into()));
        }
        if let Some(max) = self.limits.max_position {
            if max < 0 {
                return Err(FocusError::ConfigInvalid(format!(
                    "limits.max_position must be >= 0, got {max}"
                )));
            }
        }
        if self.connection.retries == 0 {
            return Err(FocusError::ConfigInvalid(
                "connection.retries must be at least 1".into(),
            ));
        }
        let backoff = self.connection.backoff_factor;
        if backoff.is_nan() || backoff < 1.0 {
            return Err(FocusError::ConfigInvalid(format!(
                "connection.backoff_factor must be >= 1.0, got {backoff}"
            )));
        }
        if self.motion.poll_interval_ms == 0 {
            return Err(FocusError::ConfigInvalid(
                "motion.poll_interval_ms must be greater than 0".into(),
            ));
        }
        if self.simulator.extent < 0 {
            return Err(FocusError::ConfigInvalid(format!(
                "simulator.extent must be >= 0, got {}",
                self.simulator.extent
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn connection_options(&self) -> ConnectionOptions {
        ConnectionOptions {
            max_retries: self.connection.retries,
            retry_delay: Duration::from_millis(self.connection.retry_delay_ms),
            backoff_factor: self.connection.backoff_factor,
            max_delay: Duration::from_millis(self.connection.max_delay_ms),
        }
    }

    #[must_use]
    pub fn tracking_options(&self) -> TrackingOptions {
        TrackingOptions {
            poll_interval: Duration::from_millis(self.motion.poll_interval_ms),
            timeout: Duration::from_secs(self.motion.timeout_secs),
        }
    }

    /// Builder for the simulated focuser at `device`.
    #[must_use]
    pub fn simulator_builder(&self, device: &str) -> MockFocuserBuilder {
        let sim = &self.simulator;
        MockFocuserBuilder::new()
            .with_device(device)
            .with_model(sim.model.clone())
            .with_serial(sim.serial.clone())
            .with_extent(sim.extent)
            .with_position(sim.position)
            .with_temperature(sim.temperature)
    }
}
