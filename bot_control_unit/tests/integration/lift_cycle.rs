//! Integration test: lift extend/retract cycle driven through the orchestrator.

use bot_common::control_unit::config::ControlUnitConfig;
use bot_common::control_unit::state::{CylinderPosition, CylinderState, RobotMode};
use bot_control_unit::cycle::{KEY_FRONT_LIFT, RobotCycle};
use bot_control_unit::io::MemoryDashboard;

use super::{at, autonomous_robot};

/// Ticks from the first held tick until the gate is open (pressure held from tick 0).
const CHARGE_TICKS: u32 = 11;

#[test]
fn front_lift_full_cycle() {
    let (mut robot, mut dash) = autonomous_robot();
    let mut tick = 0;
    let mut states = vec![robot.front_lift().state()];
    let mut step = |robot: &mut RobotCycle, dash: &mut MemoryDashboard, buttons: &[u8], n: u32| {
        for _ in 0..n {
            robot.tick(&at(tick, buttons, 2.4), dash);
            tick += 1;
            let state = robot.front_lift().state();
            if states.last() != Some(&state) {
                states.push(state);
            }
        }
    };

    step(&mut robot, &mut dash, &[], CHARGE_TICKS);
    assert!(robot.pressure().pressure_ready());
    step(&mut robot, &mut dash, &[4], 120);
    step(&mut robot, &mut dash, &[], 20);
    step(&mut robot, &mut dash, &[4], 120);
    step(&mut robot, &mut dash, &[], 20);

    assert_eq!(
        states,
        vec![
            CylinderState::AwaitExtendCmd,
            CylinderState::Extending,
            CylinderState::AwaitExtendRelease,
            CylinderState::AwaitRetractCmd,
            CylinderState::Retracting,
            CylinderState::AwaitRetractRelease,
            CylinderState::AwaitExtendCmd,
        ]
    );
    // Retracted, Extending, Extended, Retracting, Retracted
    assert_eq!(dash.publish_count(KEY_FRONT_LIFT), 5);
    assert_eq!(dash.get_str(KEY_FRONT_LIFT), Some("Retracted"));
}

#[test]
fn extend_latency_and_dwell_timing() {
    let (mut robot, mut dash) = autonomous_robot();
    for i in 0..CHARGE_TICKS {
        robot.tick(&at(i, &[], 2.4), &mut dash);
    }

    // Button held from tick 11: extend fires on its 11th held tick (tick 21).
    let mut extended_at = None;
    let mut released_at = None;
    for i in CHARGE_TICKS..200 {
        let out = robot.tick(&at(i, &[4], 2.4), &mut dash);
        if extended_at.is_none() && out.front_lift == CylinderPosition::Extended {
            extended_at = Some(i);
        }
        if released_at.is_none() && robot.front_lift().state() == CylinderState::AwaitExtendRelease {
            released_at = Some(i);
        }
    }
    assert_eq!(extended_at, Some(21));
    // 1.5 s dwell strictly exceeded: 76 ticks after the stopwatch started.
    assert_eq!(released_at, Some(21 + 76));
}

#[test]
fn lifts_are_independent() {
    let (mut robot, mut dash) = autonomous_robot();
    for i in 0..CHARGE_TICKS {
        robot.tick(&at(i, &[], 2.4), &mut dash);
    }
    for i in CHARGE_TICKS..CHARGE_TICKS + 11 {
        robot.tick(&at(i, &[5], 2.4), &mut dash);
    }
    assert_eq!(robot.rear_lift().state(), CylinderState::Extending);
    assert_eq!(robot.front_lift().state(), CylinderState::AwaitExtendCmd);
}

#[test]
fn initialize_twice_equals_once() {
    let config = ControlUnitConfig::default();
    let mut once = RobotCycle::new(&config);
    let mut twice = RobotCycle::new(&config);
    let mut dash = MemoryDashboard::new();

    for robot in [&mut once, &mut twice] {
        robot.begin_segment(RobotMode::Test);
        for i in 0..30 {
            robot.tick(&at(i, &[4, 1], 2.4), &mut dash);
        }
    }
    once.begin_segment(RobotMode::Autonomous);
    twice.begin_segment(RobotMode::Autonomous);
    twice.begin_segment(RobotMode::Autonomous);

    assert_eq!(once.snapshot(), twice.snapshot());
    for cylinder in twice.cylinders() {
        assert_eq!(cylinder.state(), CylinderState::AwaitExtendCmd);
    }

    // Both behave identically afterwards.
    for i in 30..60 {
        let a = once.tick(&at(i, &[4], 2.4), &mut dash);
        let b = twice.tick(&at(i, &[4], 2.4), &mut dash);
        assert_eq!(a, b, "tick {i}");
    }
}

#[test]
fn segment_restart_retracts_extended_lift() {
    let (mut robot, mut dash) = autonomous_robot();
    for i in 0..CHARGE_TICKS {
        robot.tick(&at(i, &[], 2.4), &mut dash);
    }
    for i in CHARGE_TICKS..200 {
        robot.tick(&at(i, &[4], 2.4), &mut dash);
    }
    assert_eq!(robot.front_lift().commanded_position(), CylinderPosition::Extended);

    robot.begin_segment(RobotMode::Test);
    let out = robot.tick(&at(200, &[], 2.4), &mut dash);
    assert_eq!(out.front_lift, CylinderPosition::Retracted);
    assert!(!out.pressure_ready);
}
