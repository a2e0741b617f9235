//! Integration tests for focuser operations using MockFocuser.
//!
//! Tests verify that focuser operations work correctly in combination,
//! including error handling, operation recording, and edge cases.

use flifocus::error::FocusError;
use flifocus::focuser::mock::{MockFocuser, MockFocuserBuilder, Operation};
use flifocus::focuser::{
    ConnectionOptions, FocuserOperations, FocuserSource, TemperatureChannel,
    open_focuser_with_retry, read_status,
};

fn focuser() -> MockFocuser {
    MockFocuserBuilder::new()
        .with_position(1000)
        .with_extent(7000)
        .with_temperature(18.5)
        .with_external_temperature(4.0)
        .build()
}

/// Blocking steps move the position by exactly the requested amount.
#[test]
fn test_blocking_steps_accumulate() {
    let mock = focuser();

    mock.step(250).unwrap();
    mock.step(-100).unwrap();
    assert_eq!(mock.position().unwrap(), 1150);

    mock.assert_operations(&[
        Operation::Step { steps: 250 },
        Operation::Step { steps: -100 },
        Operation::Position,
    ]);
}

/// The simulated mechanism stops at its travel limits.
#[test]
fn test_position_clamped_to_travel() {
    let mock = focuser();

    mock.step(-5000).unwrap();
    assert_eq!(mock.current_position(), 0);

    mock.step(10_000).unwrap();
    assert_eq!(mock.current_position(), 7000);
}

/// Both temperature channels are readable and recorded separately.
#[test]
fn test_temperature_channels() {
    let mock = focuser();

    let internal = mock.temperature(TemperatureChannel::Internal).unwrap();
    let external = mock.temperature(TemperatureChannel::External).unwrap();
    assert!((internal - 18.5).abs() < f64::EPSILON);
    assert!((external - 4.0).abs() < f64::EPSILON);

    mock.assert_operations(&[
        Operation::Temperature {
            channel: TemperatureChannel::Internal,
        },
        Operation::Temperature {
            channel: TemperatureChannel::External,
        },
    ]);
}

/// Async steps report remaining travel until the motor stops.
#[test]
fn test_async_step_drains_remaining() {
    let mock = MockFocuserBuilder::new()
        .with_position(0)
        .with_steps_per_poll(400)
        .build();

    mock.step_async(1000).unwrap();
    assert_eq!(mock.steps_remaining().unwrap(), 600);
    assert_eq!(mock.steps_remaining().unwrap(), 200);
    assert_eq!(mock.steps_remaining().unwrap(), 0);
    assert_eq!(mock.steps_remaining().unwrap(), 0);
    assert_eq!(mock.current_position(), 1000);
}

/// Homing returns the mechanism to zero and cancels pending travel.
#[test]
fn test_home_resets_position() {
    let mock = focuser();

    mock.step_async(500).unwrap();
    mock.home().unwrap();
    assert_eq!(mock.current_position(), 0);
    assert_eq!(mock.steps_remaining().unwrap(), 0);
}

/// Injected errors fail exactly one operation.
#[test]
fn test_error_injection() {
    let mock = focuser();
    mock.inject_error(FocusError::vendor("querying FLI stepper position", -5));

    let err = mock.position().unwrap_err();
    assert!(err.to_string().starts_with("Error querying FLI stepper position: "));

    // Error should be consumed, next operation should work
    assert_eq!(mock.position().unwrap(), 1000);
}

/// A disconnected focuser fails every operation until reconnected.
#[test]
fn test_disconnect_and_reconnect() {
    let mock = focuser();

    mock.disconnect();
    assert!(matches!(mock.model(), Err(FocusError::NotAttached)));
    assert!(matches!(mock.step(10), Err(FocusError::NotAttached)));
    mock.assert_no_operations();

    mock.reconnect();
    assert_eq!(mock.model().unwrap(), "Simulated Focuser");
}

/// fail_after lets a fixed number of operations through.
#[test]
fn test_fail_after_limit() {
    let mock = MockFocuserBuilder::new().fail_after(2).build();

    mock.model().unwrap();
    mock.position().unwrap();
    assert!(mock.extent().is_err());
}

/// A status snapshot reads everything and applies the soft limit.
#[test]
fn test_status_snapshot() {
    let mock = focuser();

    let status = read_status(&mock, Some(5000)).unwrap();
    assert_eq!(status.position, 1000);
    assert_eq!(status.extent, 7000);
    assert_eq!(status.lower_limit, 0);
    assert_eq!(status.upper_limit, 5000);
    assert_eq!(status.steps_remaining, 0);
    mock.assert_no_motion();
}

/// Opening a disconnected simulated focuser still succeeds; failures
/// surface on the first operation.
#[test]
fn test_open_disconnected_simulator() {
    let source = FocuserSource::Simulated(MockFocuserBuilder::new().disconnected());
    let focuser = open_focuser_with_retry(&source, &ConnectionOptions::default()).unwrap();

    assert!(matches!(focuser.position(), Err(FocusError::NotAttached)));
}
