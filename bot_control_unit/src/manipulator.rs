//! Direct-drive manipulators: climbing winch and ball intake.
//!
//! Neither has a state machine. Both map the current tick's inputs straight
//! to a motor speed.

use bot_common::consts::{
    DEADBAND, INTAKE_MAX_SPEED, WINCH_DOWN_BUTTON, WINCH_MAX_SPEED, WINCH_UP_BUTTON,
};
use bot_common::control_unit::config::ManipulatorConfig;
use bot_common::control_unit::io::ButtonSet;

// ─── Winch ──────────────────────────────────────────────────────────

/// Two-button winch with a wind counter.
///
/// The counter counts ticks spent winding up, minus ticks spent unwinding,
/// and never drops below zero. Up wins when both buttons are held.
#[derive(Debug, Clone)]
pub struct Winch {
    up_button: u8,
    down_button: u8,
    max_speed: f64,
    count: u32,
}

impl Default for Winch {
    fn default() -> Self {
        Self::new(WINCH_UP_BUTTON, WINCH_DOWN_BUTTON, WINCH_MAX_SPEED)
    }
}

impl Winch {
    pub const fn new(up_button: u8, down_button: u8, max_speed: f64) -> Self {
        Self {
            up_button,
            down_button,
            max_speed,
            count: 0,
        }
    }

    pub fn from_config(config: &ManipulatorConfig) -> Self {
        Self::new(
            config.winch_up_button,
            config.winch_down_button,
            config.winch_max_speed,
        )
    }

    /// Run one tick. Returns the winch motor speed.
    pub fn tick(&mut self, buttons: ButtonSet) -> f64 {
        if buttons.is_pressed(self.up_button) {
            self.count = self.count.saturating_add(1);
            -self.max_speed
        } else if buttons.is_pressed(self.down_button) {
            self.count = self.count.saturating_sub(1);
            self.max_speed
        } else {
            0.0
        }
    }

    #[inline]
    pub const fn count(&self) -> u32 {
        self.count
    }
}

// ─── Intake ─────────────────────────────────────────────────────────

/// Joystick-axis ball intake with a symmetric deadband.
#[derive(Debug, Clone, Copy)]
pub struct Intake {
    max_speed: f64,
    deadband: f64,
}

impl Default for Intake {
    fn default() -> Self {
        Self::new(INTAKE_MAX_SPEED, DEADBAND)
    }
}

impl Intake {
    pub const fn new(max_speed: f64, deadband: f64) -> Self {
        Self {
            max_speed,
            deadband,
        }
    }

    pub fn from_config(config: &ManipulatorConfig) -> Self {
        Self::new(config.intake_max_speed, config.deadband)
    }

    /// Map the axis to a motor speed. Pushing the stick forward (negative
    /// axis) feeds balls in. NaN reads as centered.
    pub fn speed(&self, axis: f64) -> f64 {
        let speed = -axis * self.max_speed;
        if speed.is_nan() || speed.abs() < self.deadband {
            0.0
        } else {
            speed
        }
    }
}
