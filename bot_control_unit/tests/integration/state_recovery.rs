//! Integration test: out-of-range state codes recover within one tick.

use bot_common::control_unit::state::{
    ClockState, CylinderPosition, CylinderState, PressureState,
};

use super::{at, autonomous_robot};

#[test]
fn corrupted_pressure_state_closes_gate() {
    let (mut robot, mut dash) = autonomous_robot();
    for i in 0..11 {
        robot.tick(&at(i, &[], 2.5), &mut dash);
    }
    assert!(robot.pressure().pressure_ready());

    robot.pressure_mut().load_state_code(0xFF);
    let out = robot.tick(&at(11, &[], 2.5), &mut dash);
    assert!(!out.pressure_ready);
    assert_eq!(robot.pressure().state(), PressureState::WaitPressurize);

    // Normal operation resumes: eleven more samples reopen the gate.
    let reopened = (12..23)
        .map(|i| robot.tick(&at(i, &[], 2.5), &mut dash).pressure_ready)
        .collect::<Vec<_>>();
    assert_eq!(reopened.iter().position(|&r| r), Some(10));
}

#[test]
fn corrupted_cylinder_state_retracts() {
    let (mut robot, mut dash) = autonomous_robot();
    for i in 0..11 {
        robot.tick(&at(i, &[], 2.5), &mut dash);
    }
    for i in 11..40 {
        robot.tick(&at(i, &[4], 2.5), &mut dash);
    }
    assert_eq!(robot.front_lift().state(), CylinderState::Extending);

    robot.front_lift_mut().load_state_code(200);
    let out = robot.tick(&at(40, &[], 2.5), &mut dash);
    assert_eq!(out.front_lift, CylinderPosition::Retracted);
    assert_eq!(robot.front_lift().state(), CylinderState::AwaitExtendCmd);
}

#[test]
fn corrupted_gateway_state_retracts() {
    let (mut robot, mut dash) = autonomous_robot();
    robot.tick(&at(0, &[1], 0.0), &mut dash);
    assert_eq!(robot.ball_gateway().commanded_position(), CylinderPosition::Extended);

    robot.ball_gateway_mut().load_state_code(7);
    let out = robot.tick(&at(1, &[1], 0.0), &mut dash);
    // Re-armed and, with the button still held, immediately extends again.
    assert_eq!(out.ball_gateway, CylinderPosition::Extended);
    assert_eq!(robot.ball_gateway().state(), CylinderState::AwaitExtendRelease);

    robot.ball_gateway_mut().load_state_code(7);
    let out = robot.tick(&at(2, &[], 0.0), &mut dash);
    assert_eq!(out.ball_gateway, CylinderPosition::Retracted);
}

#[test]
fn corrupted_clock_state_idles() {
    let (mut robot, mut dash) = autonomous_robot();
    robot.tick(&at(0, &[], 0.0), &mut dash);
    assert_eq!(robot.match_clock().state(), ClockState::WaitElapsed);

    robot.match_clock_mut().load_state_code(3);
    assert_eq!(robot.match_clock().state(), ClockState::WaitActivation);
    let out = robot.tick(&at(10_000, &[], 0.0), &mut dash);
    assert!(!out.climb_now);
}

#[test]
fn snapshot_codes_match_machines() {
    let (mut robot, mut dash) = autonomous_robot();
    robot.tick(&at(0, &[1], 0.0), &mut dash);
    let snap = robot.snapshot();
    assert_eq!(snap.ball_gateway as u8, robot.ball_gateway().state_code());
    assert_eq!(snap.pressure as u8, robot.pressure().state_code());
    assert_eq!(snap.clock as u8, robot.match_clock().state_code());
}
