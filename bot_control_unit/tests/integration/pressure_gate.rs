//! Integration test: pressure gate debounce through the full cycle.

use bot_common::control_unit::state::{CylinderPosition, PressureState};
use bot_control_unit::cycle::KEY_PRESSURE_OK;
use bot_control_unit::state::pressure::PressureSupervisor;
use proptest::prelude::*;

use super::{at, autonomous_robot};

const THRESHOLD: f64 = 2.0;
const SETTLE_TICKS: usize = 11;

/// Sample stream built from runs on either side of the threshold, so long
/// qualifying runs actually occur.
fn pressure_runs() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec((any::<bool>(), 1usize..25, 0.0f64..1.0), 0..60).prop_map(|runs| {
        runs.into_iter()
            .flat_map(|(high, len, frac)| {
                let volts = if high {
                    THRESHOLD + frac * 2.0
                } else {
                    THRESHOLD - 0.01 - frac * 1.9
                };
                std::iter::repeat_n(volts, len)
            })
            .collect()
    })
}

#[test]
fn rise_then_drop_scenario() {
    // 15 ticks at 2.1 V then 1.9 V against a 2.0 V threshold.
    let mut sup = PressureSupervisor::new(2.0, 10);
    let samples: Vec<f64> = (0..40).map(|i| if i < 15 { 2.1 } else { 1.9 }).collect();
    let ready: Vec<bool> = samples.iter().map(|&v| sup.tick(v)).collect();

    let first_ready = ready.iter().position(|&r| r);
    assert_eq!(first_ready, Some(10));
    // Samples 15..=24 are the first ten below threshold; the eleventh closes the gate.
    assert!(ready[10..=24].iter().all(|&r| r));
    assert!(!ready[25]);
    assert!(ready[25..].iter().all(|&r| !r));
}

#[test]
fn cycle_publishes_gate_changes_once_each() {
    let (mut robot, mut dash) = autonomous_robot();
    for i in 0..40 {
        let volts = if i < 15 { 2.1 } else { 1.9 };
        let out = robot.tick(&at(i, &[], volts), &mut dash);
        assert_eq!(out.pressure_ready, (10..25).contains(&i), "tick {i}");
    }
    // false (first tick), true, false
    assert_eq!(dash.publish_count(KEY_PRESSURE_OK), 3);
    assert_eq!(dash.get_bool(KEY_PRESSURE_OK), Some(false));
    assert_eq!(robot.pressure().state(), PressureState::WaitPressurize);
}

#[test]
fn chattering_sensor_never_opens_gate() {
    let (mut robot, mut dash) = autonomous_robot();
    for i in 0..500 {
        // Ten good samples then one bad, forever.
        let volts = if i % 11 == 10 { 1.5 } else { 2.5 };
        let out = robot.tick(&at(i, &[4, 5], volts), &mut dash);
        assert!(!out.pressure_ready);
        assert_eq!(out.front_lift, CylinderPosition::Retracted);
        assert_eq!(out.rear_lift, CylinderPosition::Retracted);
    }
}

#[test]
fn ungated_gateway_moves_without_pressure() {
    let (mut robot, mut dash) = autonomous_robot();
    let out = robot.tick(&at(0, &[1], 0.0), &mut dash);
    assert_eq!(out.ball_gateway, CylinderPosition::Extended);
    assert!(!out.pressure_ready);
}

proptest! {
    /// The gate only flips after 11 consecutive samples on the far side of
    /// the threshold, and always flips once it has seen them.
    #[test]
    fn gate_flips_exactly_after_settled_run(samples in pressure_runs()) {
        let mut sup = PressureSupervisor::new(THRESHOLD, 10);
        let mut expected = false;
        let mut run = 0usize;

        for (i, &volts) in samples.iter().enumerate() {
            let toward_flip = if expected { volts < THRESHOLD } else { volts >= THRESHOLD };
            run = if toward_flip { run + 1 } else { 0 };
            let before = sup.pressure_ready();
            let ready = sup.tick(volts);

            if ready != before {
                prop_assert!(run >= SETTLE_TICKS, "flip at {} after run {}", i, run);
            }
            if run == SETTLE_TICKS {
                expected = !expected;
                run = 0;
            }
            prop_assert_eq!(ready, expected, "sample {}", i);
        }
    }

    /// Gated lifts stay retracted under any button stream while the tanks
    /// are empty.
    #[test]
    fn gated_lifts_never_move_without_pressure(
        stream in prop::collection::vec(any::<(bool, bool)>(), 1..2000),
    ) {
        let (mut robot, mut dash) = autonomous_robot();
        for (i, &(front, rear)) in stream.iter().enumerate() {
            let mut held: Vec<u8> = Vec::new();
            if front {
                held.push(4);
            }
            if rear {
                held.push(5);
            }
            let out = robot.tick(&at(i as u32, &held, 0.3), &mut dash);
            prop_assert!(!out.pressure_ready);
            prop_assert_eq!(out.front_lift, CylinderPosition::Retracted, "tick {}", i);
            prop_assert_eq!(out.rear_lift, CylinderPosition::Retracted, "tick {}", i);
        }
    }
}
