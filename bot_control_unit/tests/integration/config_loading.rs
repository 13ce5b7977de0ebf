//! Integration test: configuration loading → cycle construction.

use std::io::Write;

use bot_common::config::ConfigError;
use bot_common::control_unit::state::{CylinderPosition, RobotMode};
use bot_control_unit::config::{LoadError, load_config, load_config_from_str};
use bot_control_unit::cycle::{CycleError, CycleRunner, RobotCycle};
use bot_control_unit::io::{IdleInputs, MemoryDashboard, SimClock};
use bot_control_unit::sim::RecordingOutputs;
use tempfile::NamedTempFile;

use super::at;

// ── Config TOML ─────────────────────────────────────────────────────

const PRACTICE_TOML: &str = r#"
cycle_time_ms = 20
debounce_window_ticks = 3

[shared]
log_level = "debug"
service_name = "practice-bot"

[pressure]
threshold_volts = 1.5

[cylinders.front_lift]
button = 6
channel = 3
dwell_s = 0.5
gated_on_pressure = true
"#;

// ── Tests ───────────────────────────────────────────────────────────

#[test]
fn practice_config_changes_behaviour() {
    let config = load_config_from_str(PRACTICE_TOML).unwrap();
    assert_eq!(config.shared.service_name, "practice-bot");
    assert_eq!(config.cylinders.front_lift.channel, 3);

    let mut robot = RobotCycle::new(&config);
    let mut dash = MemoryDashboard::new();
    robot.begin_segment(RobotMode::Autonomous);

    // Window 3: gate opens on the 4th sample at/above 1.5 V.
    let ready: Vec<bool> = (0..4)
        .map(|i| robot.tick(&at(i, &[], 1.6), &mut dash).pressure_ready)
        .collect();
    assert_eq!(ready, vec![false, false, false, true]);

    // Front lift now on button 6; button 4 does nothing.
    for i in 4..20 {
        let out = robot.tick(&at(i, &[4], 1.6), &mut dash);
        assert_eq!(out.front_lift, CylinderPosition::Retracted);
    }
    let extended = (20..24)
        .map(|i| robot.tick(&at(i, &[6], 1.6), &mut dash).front_lift)
        .collect::<Vec<_>>();
    assert_eq!(extended.last(), Some(&CylinderPosition::Extended));
}

#[test]
fn config_file_on_disk() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(PRACTICE_TOML.as_bytes()).unwrap();
    file.flush().unwrap();

    let config = load_config(file.path()).unwrap();
    assert_eq!(config.debounce_window_ticks, 3);
    assert_eq!(config.pressure.threshold_volts, 1.5);
}

#[test]
fn duplicate_channels_rejected() {
    let toml = r#"
[cylinders.rear_lift]
button = 5
channel = 0
dwell_s = 1.5
gated_on_pressure = true
"#;
    let err = load_config_from_str(toml).unwrap_err();
    match err {
        LoadError::Config(ConfigError::ValidationError(msg)) => {
            assert!(msg.contains("channel"), "{msg}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unknown_log_level_is_parse_error() {
    let err = load_config_from_str("[shared]\nlog_level = \"chatty\"").unwrap_err();
    assert!(matches!(err, LoadError::Config(ConfigError::ParseError(_))));
}

#[test]
fn runner_rejects_invalid_config() {
    let mut config = load_config_from_str("").unwrap();
    config.cycle_time_ms = 500;
    let result = CycleRunner::new(
        &config,
        IdleInputs,
        RecordingOutputs::new(&config.cylinders),
        MemoryDashboard::new(),
        SimClock::new(config.cycle_time()),
    );
    assert!(matches!(result, Err(CycleError::Config(_))));
}

#[test]
fn shipped_config_is_valid() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../config/robot.toml");
    let config = load_config(&path).unwrap();
    let defaults = load_config_from_str("").unwrap();
    assert_eq!(config.cylinders.front_lift, defaults.cylinders.front_lift);
    assert_eq!(config.cylinders.rear_lift, defaults.cylinders.rear_lift);
    assert_eq!(config.cylinders.ball_gateway, defaults.cylinders.ball_gateway);
    assert_eq!(config.cycle_time_ms, defaults.cycle_time_ms);
}
