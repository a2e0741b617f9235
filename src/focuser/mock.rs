//! In-memory focuser used for `--simulate` and for tests.
//!
//! This module provides a mock focuser that records all operations and
//! supports error injection and assertions.
//!
//! # Example
//!
//! ```rust
//! use flifocus::focuser::mock::{MockFocuserBuilder, Operation};
//! use flifocus::focuser::FocuserOperations;
//!
//! let mock = MockFocuserBuilder::new().with_position(100).build();
//!
//! mock.step(50).unwrap();
//! assert_eq!(mock.position().unwrap(), 150);
//!
//! mock.assert_operations(&[
//!     Operation::Step { steps: 50 },
//!     Operation::Position,
//! ]);
//! ```

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Mutex;

use tracing::{debug, trace};

use super::info::{BackendKind, DEFAULT_DEVICE_PATH, FocuserInfo, TemperatureChannel};
use super::FocuserOperations;
use crate::error::{FocusError, Result};

/// Recorded operation for assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Model,
    Position,
    Extent,
    Temperature { channel: TemperatureChannel },
    Step { steps: i64 },
    StepAsync { steps: i64 },
    StepsRemaining,
    Home,
}

/// Configuration for mock behavior.
#[derive(Debug, Clone)]
pub struct MockConfig {
    /// Fail after N operations (for testing error recovery).
    pub fail_after_ops: Option<usize>,
    /// Initial connection state.
    pub connected: bool,
    /// Steps an async motion advances per `steps_remaining` poll.
    pub steps_per_poll: i64,
    /// Steps every completed motion falls short of its target.
    pub backlash: i64,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            fail_after_ops: None,
            connected: true,
            steps_per_poll: 500,
            backlash: 0,
        }
    }
}

/// Mock focuser for running without real hardware.
///
/// Positions are clamped to `[0, extent]` the way the hardware stops at
/// its end stops.
pub struct MockFocuser {
    info: FocuserInfo,
    model: String,
    extent: i64,
    internal_temperature: f64,
    external_temperature: f64,
    position: AtomicI64,
    /// Signed steps still to travel in an async motion.
    pending: AtomicI64,
    operation_log: Mutex<Vec<Operation>>,
    error_injection: Mutex<Option<FocusError>>,
    config: MockConfig,
    connected: AtomicBool,
}

impl MockFocuser {
    // === Configuration ===

    /// Inject an error for the next operation.
    pub fn inject_error(&self, error: FocusError) {
        *self.error_injection.lock().unwrap() = Some(error);
    }

    /// Set device as disconnected.
    pub fn disconnect(&self) {
        self.connected.store(false, Ordering::SeqCst);
    }

    /// Set device as connected.
    pub fn reconnect(&self) {
        self.connected.store(true, Ordering::SeqCst);
    }

    // === Assertions ===

    /// Get all recorded operations.
    #[must_use]
    pub fn operations(&self) -> Vec<Operation> {
        self.operation_log.lock().unwrap().clone()
    }

    /// Get the number of operations performed.
    #[must_use]
    pub fn operation_count(&self) -> usize {
        self.operation_log.lock().unwrap().len()
    }

    /// Assert specific operations were performed.
    ///
    /// # Panics
    ///
    /// Panics if the operations don't match.
    pub fn assert_operations(&self, expected: &[Operation]) {
        let actual = self.operations();
        assert_eq!(
            actual, expected,
            "Operation mismatch.\nExpected: {expected:#?}\nActual: {actual:#?}",
        );
    }

    /// Assert no operations were performed.
    ///
    /// # Panics
    ///
    /// Panics if any operations were recorded.
    pub fn assert_no_operations(&self) {
        let ops = self.operations();
        assert!(ops.is_empty(), "Expected no operations, but found: {ops:#?}");
    }

    /// Assert no motion command was sent.
    ///
    /// # Panics
    ///
    /// Panics if a step or home operation was recorded.
    pub fn assert_no_motion(&self) {
        let ops = self.operations();
        assert!(
            !ops.iter().any(|op| matches!(
                op,
                Operation::Step { .. } | Operation::StepAsync { .. } | Operation::Home
            )),
            "Expected no motion, but found: {ops:#?}",
        );
    }

    /// Position without recording an operation.
    #[must_use]
    pub fn current_position(&self) -> i64 {
        self.position.load(Ordering::SeqCst)
    }

    /// Clear the operation log for fresh assertions.
    pub fn clear_operations(&self) {
        self.operation_log.lock().unwrap().clear();
    }

    // === Internal Helpers ===

    fn record_op(&self, op: Operation) {
        trace!(?op, "Recording operation");
        self.operation_log.lock().unwrap().push(op);
    }

    fn check_error(&self) -> Result<()> {
        if let Some(error) = self.error_injection.lock().unwrap().take() {
            return Err(error);
        }

        if !self.connected.load(Ordering::SeqCst) {
            return Err(FocusError::NotAttached);
        }

        if let Some(limit) = self.config.fail_after_ops {
            if self.operation_count() >= limit {
                return Err(FocusError::Other(
                    "Mock failure after ops limit".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Where a motion of `steps` from `from` comes to rest.
    fn landing(&self, from: i64, steps: i64) -> i64 {
        let short = self.config.backlash * steps.signum();
        (from + steps - short).clamp(0, self.extent)
    }
}

impl FocuserOperations for MockFocuser {
    fn info(&self) -> &FocuserInfo {
        &self.info
    }

    fn model(&self) -> Result<String> {
        self.check_error()?;
        self.record_op(Operation::Model);
        Ok(self.model.clone())
    }

    fn position(&self) -> Result<i64> {
        self.check_error()?;
        self.record_op(Operation::Position);
        Ok(self.position.load(Ordering::SeqCst))
    }

    fn extent(&self) -> Result<i64> {
        self.check_error()?;
        self.record_op(Operation::Extent);
        Ok(self.extent)
    }

    fn temperature(&self, channel: TemperatureChannel) -> Result<f64> {
        self.check_error()?;
        self.record_op(Operation::Temperature { channel });
        Ok(match channel {
            TemperatureChannel::Internal => self.internal_temperature,
            TemperatureChannel::External => self.external_temperature,
        })
    }

    fn step(&self, steps: i64) -> Result<()> {
        self.check_error()?;
        self.record_op(Operation::Step { steps });
        let from = self.position.load(Ordering::SeqCst);
        let to = self.landing(from, steps);
        debug!(from, to, "Mock step");
        self.position.store(to, Ordering::SeqCst);
        Ok(())
    }

    fn step_async(&self, steps: i64) -> Result<()> {
        self.check_error()?;
        self.record_op(Operation::StepAsync { steps });
        let from = self.position.load(Ordering::SeqCst);
        let travel = self.landing(from, steps) - from;
        debug!(from, travel, "Mock async step");
        self.pending.store(travel, Ordering::SeqCst);
        Ok(())
    }

    fn steps_remaining(&self) -> Result<i64> {
        self.check_error()?;
        self.record_op(Operation::StepsRemaining);

        let pending = self.pending.load(Ordering::SeqCst);
        let advance = pending.signum() * pending.abs().min(self.config.steps_per_poll);
        self.position.fetch_add(advance, Ordering::SeqCst);
        let left = pending - advance;
        self.pending.store(left, Ordering::SeqCst);
        Ok(left.abs())
    }

    fn home(&self) -> Result<()> {
        self.check_error()?;
        self.record_op(Operation::Home);
        self.pending.store(0, Ordering::SeqCst);
        self.position.store(0, Ordering::SeqCst);
        Ok(())
    }
}

/// Builder for creating a `MockFocuser`.
///
/// The builder is also what `--simulate` carries around, so it is `Clone`
/// and cheap to keep.
#[derive(Debug, Clone)]
pub struct MockFocuserBuilder {
    device: String,
    model: String,
    serial: String,
    position: i64,
    extent: i64,
    internal_temperature: f64,
    external_temperature: f64,
    config: MockConfig,
}

impl Default for MockFocuserBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MockFocuserBuilder {
    /// A focuser at position 0 with a 7000-step extent.
    #[must_use]
    pub fn new() -> Self {
        Self {
            device: DEFAULT_DEVICE_PATH.to_string(),
            model: "Simulated Focuser".to_string(),
            serial: "SIM-0001".to_string(),
            position: 0,
            extent: 7000,
            internal_temperature: 20.0,
            external_temperature: 20.0,
            config: MockConfig::default(),
        }
    }

    #[must_use]
    pub fn device(&self) -> &str {
        &self.device
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    #[must_use]
    pub fn with_device(mut self, device: impl Into<String>) -> Self {
        self.device = device.into();
        self
    }

    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    #[must_use]
    pub fn with_serial(mut self, serial: impl Into<String>) -> Self {
        self.serial = serial.into();
        self
    }

    #[must_use]
    pub fn with_position(mut self, position: i64) -> Self {
        self.position = position;
        self
    }

    #[must_use]
    pub fn with_extent(mut self, extent: i64) -> Self {
        self.extent = extent;
        self
    }

    /// Set both temperature channels.
    #[must_use]
    pub fn with_temperature(mut self, celsius: f64) -> Self {
        self.internal_temperature = celsius;
        self.external_temperature = celsius;
        self
    }

    #[must_use]
    pub fn with_external_temperature(mut self, celsius: f64) -> Self {
        self.external_temperature = celsius;
        self
    }

    /// Set device to fail after N operations.
    #[must_use]
    pub fn fail_after(mut self, ops: usize) -> Self {
        self.config.fail_after_ops = Some(ops);
        self
    }

    /// Create device in disconnected state.
    #[must_use]
    pub fn disconnected(mut self) -> Self {
        self.config.connected = false;
        self
    }

    #[must_use]
    pub fn with_steps_per_poll(mut self, steps: i64) -> Self {
        self.config.steps_per_poll = steps.max(0);
        self
    }

    /// Make every motion stop `steps` short of its target.
    #[must_use]
    pub fn with_backlash(mut self, steps: i64) -> Self {
        self.config.backlash = steps;
        self
    }

    /// Build the mock focuser.
    #[must_use]
    pub fn build(self) -> MockFocuser {
        debug!(model = %self.model, position = self.position, extent = self.extent, "Creating mock focuser");
        MockFocuser {
            info: FocuserInfo {
                device: self.device,
                serial: self.serial,
                firmware_revision: Some(0x0100),
                hardware_revision: Some(1),
                backend: BackendKind::Simulated,
            },
            model: self.model,
            extent: self.extent,
            internal_temperature: self.internal_temperature,
            external_temperature: self.external_temperature,
            position: AtomicI64::new(self.position.clamp(0, self.extent)),
            pending: AtomicI64::new(0),
            operation_log: Mutex::new(Vec::new()),
            error_injection: Mutex::new(None),
            connected: AtomicBool::new(self.config.connected),
            config: self.config,
        }
    }
}
