mod config_loading;
mod lift_cycle;
mod match_clock;
mod pressure_gate;
mod scenario_run;
mod state_recovery;

use std::time::Duration;

use bot_common::control_unit::config::ControlUnitConfig;
use bot_common::control_unit::io::{ButtonSet, ControlInputs};
use bot_common::control_unit::state::RobotMode;
use bot_control_unit::cycle::RobotCycle;
use bot_control_unit::io::MemoryDashboard;

pub const TICK: Duration = Duration::from_millis(20);

/// Robot with default config, already in autonomous.
pub fn autonomous_robot() -> (RobotCycle, MemoryDashboard) {
    let mut robot = RobotCycle::new(&ControlUnitConfig::default());
    robot.begin_segment(RobotMode::Autonomous);
    (robot, MemoryDashboard::new())
}

/// Inputs for tick `index` on the default 20 ms grid.
pub fn at(index: u32, buttons: &[u8], volts: f64) -> ControlInputs {
    ControlInputs::idle(TICK * index)
        .with_buttons(ButtonSet::from_buttons(buttons))
        .with_pressure(volts)
}
