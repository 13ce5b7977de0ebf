//! Integration test: scripted scenario played through the cycle runner.

use std::sync::atomic::AtomicBool;

use bot_common::control_unit::state::{CylinderPosition, CylinderState, RobotMode};
use bot_control_unit::config::load_config_from_str;
use bot_control_unit::cycle::{CycleRunner, KEY_MODE, KEY_WINCH_COUNT};
use bot_control_unit::io::{InputSource, MemoryDashboard, SimClock};
use bot_control_unit::sim::{RecordingOutputs, Scenario, ScriptedInputs};

const SCENARIO: &str = r#"
name = "charge-and-lift"

[[steps]]
ticks = 11
segment = "autonomous"
pressure_volts = 2.2

[[steps]]
ticks = 11
buttons = [5]
pressure_volts = 2.2

[[steps]]
ticks = 5
segment = "teleop"
buttons = [3]
pressure_volts = 2.2
intake_axis = -1.0
"#;

type SimRunner = CycleRunner<ScriptedInputs, RecordingOutputs, MemoryDashboard, SimClock>;

fn runner(scenario: &str) -> SimRunner {
    let config = load_config_from_str("").unwrap();
    let inputs = ScriptedInputs::new(Scenario::parse(scenario).unwrap());
    let outputs = RecordingOutputs::new(&config.cylinders).with_history();
    CycleRunner::new(
        &config,
        inputs,
        outputs,
        MemoryDashboard::new(),
        SimClock::new(config.cycle_time()),
    )
    .unwrap()
}

#[test]
fn scenario_runs_to_completion() {
    let mut runner = runner(SCENARIO);
    let executed = runner.run_for(1_000);
    assert_eq!(executed, 27);
    assert!(runner.inputs().is_exhausted());
    assert_eq!(runner.stats().cycle_count, 27);
    assert_eq!(runner.outputs().writes(), 27);
    assert!(runner.outputs().compressor_enabled());
}

#[test]
fn scenario_drives_machines() {
    let mut runner = runner(SCENARIO);
    runner.run_for(22);
    assert!(runner.last_outputs().pressure_ready);
    assert_eq!(runner.cycle().rear_lift().state(), CylinderState::Extending);
    // Rear lift is on solenoid channel 1.
    assert!(runner.outputs().solenoid(1));
    assert!(!runner.outputs().solenoid(0));

    runner.run_for(5);
    assert_eq!(runner.cycle().mode(), RobotMode::Teleop);
    let last = *runner.last_outputs();
    assert_eq!(last.winch_speed, -0.75);
    assert_eq!(last.intake_speed, 1.0);
    assert_eq!(last.rear_lift, CylinderPosition::Extended);
    assert_eq!(runner.dashboard().get_number(KEY_WINCH_COUNT), Some(5.0));
    assert_eq!(runner.dashboard().get_str(KEY_MODE), Some("Teleop"));
}

#[test]
fn run_for_stops_at_limit() {
    let mut runner = runner(SCENARIO);
    assert_eq!(runner.run_for(10), 10);
    assert_eq!(runner.outputs().history().len(), 10);
    assert!(runner.outputs().history().iter().all(|o| !o.pressure_ready));
}

#[test]
fn run_until_honours_cleared_flag() {
    let mut runner = runner(SCENARIO);
    let running = AtomicBool::new(false);
    assert_eq!(runner.run_until(&running), 0);
    assert_eq!(runner.stats().cycle_count, 0);
}

#[test]
fn run_until_limit_bounds_ticks() {
    let mut runner = runner(SCENARIO);
    let running = AtomicBool::new(true);
    assert_eq!(runner.run_until_limit(&running, 3), 3);
    assert_eq!(runner.run_until(&running), 24);
}

#[test]
fn shipped_scenario_is_valid() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../config/scenarios/lift_cycle.toml");
    let scenario = Scenario::load(&path).unwrap();
    assert_eq!(scenario.steps[0].segment, Some(RobotMode::Autonomous));

    let mut runner = runner(&std::fs::read_to_string(&path).unwrap());
    let executed = runner.run_for(u64::MAX);
    assert_eq!(executed, scenario.total_ticks());
    assert_eq!(runner.cycle().mode(), RobotMode::Teleop);
}
