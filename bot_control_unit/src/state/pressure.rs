//! Tank pressure readiness gate.
//!
//! Converts the noisy analog pressure sensor into a stable `pressure_ready`
//! boolean. The gate opens after the sample has stayed at or above the
//! threshold for `window + 1` consecutive ticks and closes after it has stayed
//! below for the same count. A single contrary sample restarts the count.
//!
//! Gated cylinders read the gate after this machine has run in the same tick.

use bot_common::consts::{DEBOUNCE_WINDOW_TICKS, PRESSURE_THRESHOLD_VOLTS};
use bot_common::control_unit::state::PressureState;
use tracing::{debug, info, warn};

use crate::debounce::{AnalogThreshold, ThresholdDirection};

/// Debounced pressure-readiness state machine.
#[derive(Debug, Clone)]
pub struct PressureSupervisor {
    state: PressureState,
    pressure_ready: bool,
    last_sample: f64,
    rise: AnalogThreshold,
    fall: AnalogThreshold,
}

impl Default for PressureSupervisor {
    fn default() -> Self {
        Self::new(PRESSURE_THRESHOLD_VOLTS, DEBOUNCE_WINDOW_TICKS)
    }
}

impl PressureSupervisor {
    /// Create a supervisor already waiting for pressure (gate closed).
    pub fn new(threshold_volts: f64, window: u32) -> Self {
        let mut supervisor = Self {
            state: PressureState::Initialize,
            pressure_ready: false,
            last_sample: 0.0,
            rise: AnalogThreshold::new(threshold_volts, ThresholdDirection::AtOrAbove, window),
            fall: AnalogThreshold::new(threshold_volts, ThresholdDirection::Below, window),
        };
        supervisor.initialize();
        supervisor
    }

    /// Close the gate and restart the rise count.
    pub fn reset(&mut self) {
        self.state = PressureState::Initialize;
        self.initialize();
    }

    /// Current state.
    #[inline]
    pub const fn state(&self) -> PressureState {
        self.state
    }

    /// Raw state code for telemetry.
    #[inline]
    pub const fn state_code(&self) -> u8 {
        self.state as u8
    }

    /// Whether the tanks are charged. True only in `Pressurized`.
    #[inline]
    pub const fn pressure_ready(&self) -> bool {
        self.pressure_ready
    }

    /// Sample consumed by the most recent tick.
    #[inline]
    pub const fn last_sample(&self) -> f64 {
        self.last_sample
    }

    #[inline]
    pub const fn threshold(&self) -> f64 {
        self.rise.level()
    }

    /// Overwrite the state from a raw code (telemetry replay, fault injection).
    ///
    /// An unknown code is treated as an unreachable state: the machine falls
    /// back to `Initialize`, which the next tick performs.
    pub fn load_state_code(&mut self, code: u8) {
        match PressureState::from_u8(code) {
            Some(state) => self.state = state,
            None => {
                warn!(
                    machine = "pressure",
                    code, "unknown state code, re-initializing"
                );
                self.state = PressureState::Initialize;
            }
        }
    }

    /// Run one tick against the latest sensor voltage. Returns the gate.
    pub fn tick(&mut self, sample_volts: f64) -> bool {
        match self.state {
            PressureState::Initialize => self.initialize(),
            PressureState::WaitPressurize => {
                self.last_sample = sample_volts;
                if self.rise.observe(sample_volts) {
                    self.pressure_ready = true;
                    self.fall.reset();
                    info!(volts = sample_volts, "tank pressure OK");
                    self.transition(PressureState::Pressurized);
                }
            }
            PressureState::Pressurized => {
                self.last_sample = sample_volts;
                if self.fall.observe(sample_volts) {
                    self.pressure_ready = false;
                    self.rise.reset();
                    info!(volts = sample_volts, "tank pressure lost");
                    self.transition(PressureState::WaitPressurize);
                }
            }
        }
        self.pressure_ready
    }

    fn initialize(&mut self) {
        self.pressure_ready = false;
        self.rise.reset();
        self.fall.reset();
        self.transition(PressureState::WaitPressurize);
    }

    fn transition(&mut self, to: PressureState) {
        if to != self.state {
            debug!(
                machine = "pressure",
                from = self.state.name(),
                to = to.name(),
                "transition"
            );
        }
        self.state = to;
    }
}
