//! Human-mode end-to-end tests.

use regex::Regex;

use crate::common::cli::CliRunner;
use crate::common::fixtures::TestConfig;
use crate::common::init_test_logging;

#[test]
fn goto_prints_full_transcript() {
    init_test_logging();
    let config = TestConfig::simulator();
    let result = CliRunner::new().run_simulated(&config, &["goto", "2500"]);
    result.assert_success();

    let expected = "FLI model: FLI PDF Test\n\
                    FLI stepper position: 1000\n\
                    FLI maximum stepper position: 7000\n\
                    FLI T_int: 18.25\n\
                    \n\
                    Moving 1500 steps...\n\
                    FLI stepper position: 2500\n";
    assert_eq!(result.stdout, expected);
}

#[test]
fn goto_backwards_prints_negative_delta() {
    init_test_logging();
    let config = TestConfig::simulator();
    let result = CliRunner::new().run_simulated(&config, &["goto", "250"]);

    result
        .assert_success()
        .assert_stdout_contains("Moving -750 steps...")
        .assert_stdout_contains("FLI stepper position: 250");
}

#[test]
fn goto_out_of_range_fails_before_temperature() {
    init_test_logging();
    let config = TestConfig::simulator();
    let result = CliRunner::new().run_simulated(&config, &["goto", "7001"]);

    result
        .assert_exit_code(1)
        .assert_stderr_contains("Need to specify focuser position between 0 and 7000.")
        .assert_stdout_contains("FLI maximum stepper position: 7000");
    assert!(!result.stdout.contains("T_int"));
    assert!(!result.stdout.contains("Moving"));
}

#[test]
fn goto_negative_position_is_out_of_range() {
    init_test_logging();
    let config = TestConfig::simulator();
    let result = CliRunner::new().run_simulated(&config, &["goto", "-5"]);

    result
        .assert_exit_code(1)
        .assert_stderr_contains("between 0 and 7000");
}

#[test]
fn goto_non_numeric_is_usage_error() {
    init_test_logging();
    let config = TestConfig::simulator();
    let result = CliRunner::new().run_simulated(&config, &["goto", "far"]);

    result.assert_exit_code(2);
    assert!(result.stdout.is_empty());
}

#[test]
fn goto_soft_limit_from_config() {
    init_test_logging();
    let config = TestConfig::simulator_with("[limits]\nmax_position = 5000\n");
    let result = CliRunner::new().run_simulated(&config, &["goto", "6000"]);

    result
        .assert_exit_code(1)
        .assert_stderr_contains("between 0 and 5000");
}

#[test]
fn goto_same_position_moves_zero_steps() {
    init_test_logging();
    let config = TestConfig::simulator();
    let result = CliRunner::new().run_simulated(&config, &["goto", "1000"]);

    result
        .assert_success()
        .assert_stdout_contains("Moving 0 steps...");
}

#[test]
fn goto_async_reports_commanded() {
    init_test_logging();
    let config = TestConfig::simulator();
    let result = CliRunner::new().run_simulated(&config, &["goto", "3000", "--async"]);

    result
        .assert_success()
        .assert_stdout_contains("Moving 2000 steps...")
        .assert_stdout_contains("Motion commanded");
}

#[test]
fn quiet_goto_prints_only_final_position() {
    init_test_logging();
    let config = TestConfig::simulator();
    let result = CliRunner::new().run_simulated(&config, &["-q", "goto", "1200"]);

    result.assert_success();
    assert_eq!(result.stdout.trim(), "FLI stepper position: 1200");
}

#[test]
fn step_out_of_range_names_attempted_position() {
    init_test_logging();
    let config = TestConfig::simulator();
    let result = CliRunner::new().run_simulated(&config, &["step", "-1500"]);

    result
        .assert_exit_code(1)
        .assert_stderr_contains("Attempted motion to position -500 is out of range (0,7000).");
}

#[test]
fn step_with_progress_completes() {
    init_test_logging();
    let config = TestConfig::simulator_with("[motion]\npoll_interval_ms = 1\n");
    let result = CliRunner::new().run_simulated(&config, &["step", "1200", "--progress"]);

    result
        .assert_success()
        .assert_stdout_contains("Moving 1200 steps...")
        .assert_stdout_contains("FLI stepper position: 2200");
}

#[test]
fn status_lists_readings() {
    init_test_logging();
    let config = TestConfig::simulator();
    let result = CliRunner::new().run_simulated(&config, &["status"]);

    result
        .assert_success()
        .assert_stdout_contains("FLI PDF Test")
        .assert_stdout_contains("PDF-TEST")
        .assert_stdout_contains("0..=7000");
    let temp = Regex::new(r"T_int \(C\)\s+18\.25").unwrap();
    assert!(temp.is_match(&result.stdout), "stdout:\n{}", result.stdout);
}

#[test]
fn temperature_external_channel() {
    init_test_logging();
    let config = TestConfig::simulator();
    let result =
        CliRunner::new().run_simulated(&config, &["temperature", "--channel", "external"]);

    let line = Regex::new(r"^FLI T_ext: -?\d+\.\d{2}$").unwrap();
    result.assert_success();
    assert!(line.is_match(result.stdout.trim()), "stdout:\n{}", result.stdout);
}

#[test]
fn home_returns_to_zero() {
    init_test_logging();
    let config = TestConfig::simulator();
    let result = CliRunner::new().run_simulated(&config, &["home"]);

    result
        .assert_success()
        .assert_stdout_contains("FLI stepper position: 0");
}

#[test]
fn missing_explicit_config_is_error() {
    init_test_logging();
    let result = CliRunner::new().run(&[
        "--simulate",
        "--config",
        "/nonexistent/flifocus.toml",
        "status",
    ]);

    result
        .assert_exit_code(1)
        .assert_stderr_contains("Configuration file not found")
        .assert_stderr_contains("Hint:");
}

#[test]
fn quick_start_without_command() {
    init_test_logging();
    let result = CliRunner::new().run(&[]);

    result
        .assert_success()
        .assert_stdout_contains("QUICK START")
        .assert_stdout_contains("flifocus goto");
}
