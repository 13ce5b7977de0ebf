//! Per-tick input and output snapshots.
//!
//! The control cycle reads one [`ControlInputs`] at the top of each tick and
//! produces one [`ControlOutputs`] at the bottom. Both are plain `Copy` data;
//! hardware adapters and the simulator translate to and from them.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use static_assertions::const_assert;

use super::state::{ClockState, CylinderPosition, CylinderState, PressureState, RobotMode};
use crate::consts::MAX_BUTTON;

// ─── Buttons ────────────────────────────────────────────────────────

/// Joystick button levels as a bitmask. Button numbers are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ButtonSet(u32);

const_assert!(MAX_BUTTON as u32 <= u32::BITS);

impl ButtonSet {
    /// No buttons held.
    pub const NONE: Self = Self(0);

    #[inline]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Set built from a list of held button numbers. Out-of-range numbers are ignored.
    pub fn from_buttons(buttons: &[u8]) -> Self {
        let mut set = Self::NONE;
        for &button in buttons {
            set.press(button);
        }
        set
    }

    /// Whether `button` is held. Button 0 and numbers above 32 are never held.
    #[inline]
    pub const fn is_pressed(self, button: u8) -> bool {
        if button == 0 || button > MAX_BUTTON {
            return false;
        }
        self.0 & (1 << (button - 1)) != 0
    }

    pub fn press(&mut self, button: u8) {
        if button != 0 && button <= MAX_BUTTON {
            self.0 |= 1 << (button - 1);
        }
    }

    pub fn release(&mut self, button: u8) {
        if button != 0 && button <= MAX_BUTTON {
            self.0 &= !(1 << (button - 1));
        }
    }
}

// ─── Inputs ─────────────────────────────────────────────────────────

/// Everything the cycle samples at the top of a tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ControlInputs {
    /// Monotonic tick timestamp.
    pub now: Duration,
    /// Joystick button levels.
    pub buttons: ButtonSet,
    /// Analog pressure sensor [V].
    pub pressure_volts: f64,
    /// Intake joystick axis, -1.0..=1.0.
    pub intake_axis: f64,
}

impl ControlInputs {
    /// No buttons, zero pressure, centered axis.
    pub const fn idle(now: Duration) -> Self {
        Self {
            now,
            buttons: ButtonSet::NONE,
            pressure_volts: 0.0,
            intake_axis: 0.0,
        }
    }

    pub const fn with_buttons(mut self, buttons: ButtonSet) -> Self {
        self.buttons = buttons;
        self
    }

    pub const fn with_pressure(mut self, volts: f64) -> Self {
        self.pressure_volts = volts;
        self
    }

    pub const fn with_intake_axis(mut self, axis: f64) -> Self {
        self.intake_axis = axis;
        self
    }
}

// ─── Outputs ────────────────────────────────────────────────────────

/// Actuator commands produced at the bottom of a tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlOutputs {
    pub front_lift: CylinderPosition,
    pub rear_lift: CylinderPosition,
    pub ball_gateway: CylinderPosition,
    /// Winch motor speed, -1.0..=1.0.
    pub winch_speed: f64,
    /// Intake motor speed, -1.0..=1.0.
    pub intake_speed: f64,
    pub pressure_ready: bool,
    pub climb_now: bool,
    /// Closed-loop compressor control request.
    pub compressor_enabled: bool,
}

impl Default for ControlOutputs {
    fn default() -> Self {
        Self {
            front_lift: CylinderPosition::Retracted,
            rear_lift: CylinderPosition::Retracted,
            ball_gateway: CylinderPosition::Retracted,
            winch_speed: 0.0,
            intake_speed: 0.0,
            pressure_ready: false,
            climb_now: false,
            compressor_enabled: true,
        }
    }
}

// ─── Snapshot ───────────────────────────────────────────────────────

/// Observable machine state after a tick.
///
/// Compared against the previous tick's snapshot to publish dashboard values
/// only when they change.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ControlSnapshot {
    pub mode: RobotMode,
    pub pressure: PressureState,
    pub pressure_ready: bool,
    pub front_lift: CylinderState,
    pub rear_lift: CylinderState,
    pub ball_gateway: CylinderState,
    pub clock: ClockState,
    pub climb_now: bool,
    pub winch_count: u32,
    pub intake_speed: f64,
}
