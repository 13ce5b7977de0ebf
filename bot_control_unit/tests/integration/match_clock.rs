//! Integration test: match clock climb latch across segment changes.

use std::time::Duration;

use bot_common::control_unit::config::ControlUnitConfig;
use bot_common::control_unit::io::ControlInputs;
use bot_common::control_unit::state::{ClockState, RobotMode};
use bot_control_unit::cycle::{KEY_CLIMB, RobotCycle};
use bot_control_unit::io::MemoryDashboard;

use super::autonomous_robot;

fn at_secs(secs: f64) -> ControlInputs {
    ControlInputs::idle(Duration::from_secs_f64(secs))
}

#[test]
fn climb_flag_flips_just_after_ninety_seconds() {
    let (mut robot, mut dash) = autonomous_robot();
    assert!(!robot.tick(&at_secs(0.0), &mut dash).climb_now);
    assert!(!robot.tick(&at_secs(89.9), &mut dash).climb_now);
    assert!(robot.tick(&at_secs(90.1), &mut dash).climb_now);
    assert_eq!(robot.match_clock().state(), ClockState::WaitActivation);
    assert!(robot.tick(&at_secs(150.0), &mut dash).climb_now);
    assert_eq!(dash.publish_count(KEY_CLIMB), 2);
}

#[test]
fn teleop_keeps_clock_running() {
    let (mut robot, mut dash) = autonomous_robot();
    robot.tick(&at_secs(0.0), &mut dash);
    robot.tick(&at_secs(15.0), &mut dash);
    robot.begin_segment(RobotMode::Teleop);
    assert!(!robot.tick(&at_secs(85.0), &mut dash).climb_now);
    assert!(robot.tick(&at_secs(90.02), &mut dash).climb_now);
}

#[test]
fn new_segment_clears_latch_on_next_tick() {
    let (mut robot, mut dash) = autonomous_robot();
    robot.tick(&at_secs(0.0), &mut dash);
    assert!(robot.tick(&at_secs(91.0), &mut dash).climb_now);

    robot.begin_segment(RobotMode::Test);
    assert_eq!(robot.match_clock().state(), ClockState::Initialize);
    // Latch holds until the restart tick runs.
    assert!(robot.match_clock().climb_now());
    assert!(!robot.tick(&at_secs(100.0), &mut dash).climb_now);
    assert!(!robot.tick(&at_secs(190.0), &mut dash).climb_now);
    assert!(robot.tick(&at_secs(190.1), &mut dash).climb_now);
}

#[test]
fn clock_never_starts_without_segment() {
    let mut robot = RobotCycle::new(&ControlUnitConfig::default());
    let mut dash = MemoryDashboard::new();
    for secs in [0.0, 50.0, 100.0, 1000.0] {
        assert!(!robot.tick(&at_secs(secs), &mut dash).climb_now);
    }
    assert_eq!(robot.match_clock().state(), ClockState::WaitActivation);
}

#[test]
fn configurable_threshold() {
    let mut config = ControlUnitConfig::default();
    config.match_clock.climb_after_s = 30.0;
    let mut robot = RobotCycle::new(&config);
    let mut dash = MemoryDashboard::new();
    robot.begin_segment(RobotMode::Autonomous);
    robot.tick(&at_secs(0.0), &mut dash);
    assert!(!robot.tick(&at_secs(30.0), &mut dash).climb_now);
    assert!(robot.tick(&at_secs(30.02), &mut dash).climb_now);
}
