//! Integration tests for the goto, step and home sequences.
//!
//! The mock records every call, so these tests pin down the order of
//! device operations as well as the reports.

use std::time::Duration;

use flifocus::error::FocusError;
use flifocus::focuser::mock::{MockFocuser, MockFocuserBuilder, Operation};
use flifocus::focuser::sequence::{MoveOptions, NoopObserver, run_goto, run_home, run_step};
use flifocus::focuser::{MotionMode, TemperatureChannel, TrackingOptions};

fn focuser_at(position: i64) -> MockFocuser {
    MockFocuserBuilder::new()
        .with_model("FLI PDF")
        .with_position(position)
        .with_extent(7000)
        .build()
}

fn tracked() -> MoveOptions {
    MoveOptions {
        mode: MotionMode::Tracked,
        tracking: TrackingOptions {
            poll_interval: Duration::from_millis(1),
            timeout: Duration::from_secs(5),
        },
        ..MoveOptions::default()
    }
}

/// The full goto sequence issues its calls in a fixed order.
#[test]
fn test_goto_operation_order() {
    let mock = focuser_at(1000);

    let report = run_goto(&mock, 2500, &MoveOptions::default(), &NoopObserver).unwrap();

    mock.assert_operations(&[
        Operation::Model,
        Operation::Position,
        Operation::Extent,
        Operation::Temperature {
            channel: TemperatureChannel::Internal,
        },
        Operation::Step { steps: 1500 },
        Operation::Position,
    ]);
    assert_eq!(report.model, "FLI PDF");
    assert_eq!(report.extent, 7000);
    assert_eq!(report.motion.delta, 1500);
    assert_eq!(report.motion.final_position, Some(2500));
    assert_eq!(report.motion.reached, Some(true));
}

/// Out-of-range targets fail after the extent query, before the
/// temperature read and before any motion.
#[test]
fn test_goto_rejects_out_of_range_before_motion() {
    for target in [-1, 7001] {
        let mock = focuser_at(1000);

        let err = run_goto(&mock, target, &MoveOptions::default(), &NoopObserver).unwrap_err();

        assert_eq!(
            err.to_string(),
            "Need to specify focuser position between 0 and 7000."
        );
        mock.assert_operations(&[Operation::Model, Operation::Position, Operation::Extent]);
    }
}

/// Both ends of the range are valid targets.
#[test]
fn test_goto_accepts_range_endpoints() {
    let mock = focuser_at(1000);
    run_goto(&mock, 0, &MoveOptions::default(), &NoopObserver).unwrap();
    assert_eq!(mock.current_position(), 0);

    run_goto(&mock, 7000, &MoveOptions::default(), &NoopObserver).unwrap();
    assert_eq!(mock.current_position(), 7000);
}

/// The soft limit tightens the accepted range.
#[test]
fn test_goto_respects_soft_limit() {
    let mock = focuser_at(1000);
    let options = MoveOptions {
        max_position: Some(5000),
        ..MoveOptions::default()
    };

    let err = run_goto(&mock, 6000, &options, &NoopObserver).unwrap_err();
    assert!(matches!(
        err,
        FocusError::PositionOutOfRange { max: 5000, .. }
    ));
    mock.assert_no_motion();
}

/// Going to the current position sends no motor command.
#[test]
fn test_goto_current_position_skips_motor() {
    let mock = focuser_at(3000);

    let report = run_goto(&mock, 3000, &MoveOptions::default(), &NoopObserver).unwrap();

    assert_eq!(report.motion.delta, 0);
    assert_eq!(report.motion.reached, Some(true));
    mock.assert_no_motion();
}

/// Backlash leaves the focuser short; the sequence reports it but succeeds.
#[test]
fn test_goto_reports_missed_target() {
    let mock = MockFocuserBuilder::new()
        .with_position(1000)
        .with_backlash(3)
        .build();

    let report = run_goto(&mock, 2000, &MoveOptions::default(), &NoopObserver).unwrap();

    assert_eq!(report.motion.final_position, Some(1997));
    assert_eq!(report.motion.reached, Some(false));
}

/// Async motion is commanded and not verified.
#[test]
fn test_goto_async_skips_verify() {
    let mock = focuser_at(1000);
    let options = MoveOptions {
        mode: MotionMode::Async,
        ..MoveOptions::default()
    };

    let report = run_goto(&mock, 1500, &options, &NoopObserver).unwrap();

    assert!(!report.motion.completed);
    assert_eq!(report.motion.final_position, None);
    assert_eq!(
        mock.operations().last(),
        Some(&Operation::StepAsync { steps: 500 })
    );
}

/// Tracked motion polls until the motor stops, then verifies.
#[test]
fn test_goto_tracked_polls_then_verifies() {
    let mock = MockFocuserBuilder::new()
        .with_position(0)
        .with_steps_per_poll(1000)
        .build();

    let report = run_goto(&mock, 2500, &tracked(), &NoopObserver).unwrap();

    assert!(report.motion.completed);
    assert_eq!(report.motion.final_position, Some(2500));
    let polls = mock
        .operations()
        .iter()
        .filter(|op| **op == Operation::StepsRemaining)
        .count();
    assert_eq!(polls, 3);
}

/// A motor that never finishes trips the motion timeout.
#[test]
fn test_tracked_motion_timeout() {
    let mock = MockFocuserBuilder::new()
        .with_position(0)
        .with_steps_per_poll(1)
        .build();
    let options = MoveOptions {
        tracking: TrackingOptions {
            poll_interval: Duration::from_millis(5),
            timeout: Duration::from_millis(20),
        },
        ..tracked()
    };

    let err = run_goto(&mock, 5000, &options, &NoopObserver).unwrap_err();
    assert!(matches!(err, FocusError::MotionTimeout { .. }));
}

/// Relative steps are range checked against the resulting position.
#[test]
fn test_step_range_check() {
    let mock = focuser_at(100);

    let err = run_step(&mock, -200, &MoveOptions::default(), &NoopObserver).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Attempted motion to position -100 is out of range (0,7000)."
    );
    mock.assert_no_motion();

    let report = run_step(&mock, -100, &MoveOptions::default(), &NoopObserver).unwrap();
    assert_eq!(report.target, 0);
    assert_eq!(report.final_position, Some(0));
}

/// Homing runs the vendor routine and reads back zero.
#[test]
fn test_home_sequence() {
    let mock = focuser_at(4200);

    let report = run_home(&mock, &NoopObserver).unwrap();

    assert!(report.homed);
    assert_eq!(report.position, 0);
    mock.assert_operations(&[Operation::Home, Operation::Position]);
}

/// A vendor failure part-way aborts the sequence with that error.
#[test]
fn test_goto_aborts_on_vendor_error() {
    let mock = MockFocuserBuilder::new().fail_after(3).build();

    let err = run_goto(&mock, 10, &MoveOptions::default(), &NoopObserver).unwrap_err();
    assert!(matches!(err, FocusError::Other(_)));
    mock.assert_no_motion();
}
