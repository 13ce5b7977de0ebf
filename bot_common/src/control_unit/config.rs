//! Configuration structures for the control unit.
//!
//! All config types use `serde::Deserialize` for TOML loading. Every field
//! has a default matching the competition robot, so an empty file is a valid
//! configuration. Numeric parameters are bounds-checked by `validate()`.

use serde::{Deserialize, Serialize};

use crate::config::SharedConfig;
use crate::consts::{
    BALL_GATEWAY_BUTTON, BALL_GATEWAY_CHANNEL, CLIMB_AFTER_S, CLIMB_AFTER_S_MAX,
    CLIMB_AFTER_S_MIN, CYCLE_TIME_MS, CYCLE_TIME_MS_MAX, CYCLE_TIME_MS_MIN, DEADBAND,
    DEADBAND_MAX, DEBOUNCE_WINDOW_TICKS, DEBOUNCE_WINDOW_TICKS_MAX, DWELL_S_MAX, DWELL_S_MIN,
    FRONT_LIFT_BUTTON, FRONT_LIFT_CHANNEL, INTAKE_MAX_SPEED, LIFT_DWELL_S, MAX_BUTTON,
    PRESSURE_SENSOR_MAX_VOLTS, PRESSURE_THRESHOLD_VOLTS, REAR_LIFT_BUTTON, REAR_LIFT_CHANNEL,
    SOLENOID_CHANNELS, WINCH_DOWN_BUTTON, WINCH_MAX_SPEED, WINCH_UP_BUTTON,
};

// ─── Top-Level Config ───────────────────────────────────────────────

/// Top-level control-unit configuration.
///
/// Loaded from TOML at startup; immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlUnitConfig {
    /// Logging and instance identification.
    #[serde(default)]
    pub shared: SharedConfig,

    /// Control-loop period in milliseconds (default: 20).
    #[serde(default = "default_cycle_time_ms")]
    pub cycle_time_ms: u32,

    /// Debounce window in ticks; a decision fires when the count exceeds it
    /// (default: 10).
    #[serde(default = "default_debounce_window")]
    pub debounce_window_ticks: u32,

    #[serde(default)]
    pub pressure: PressureConfig,

    #[serde(default)]
    pub match_clock: MatchClockConfig,

    #[serde(default)]
    pub cylinders: CylindersConfig,

    #[serde(default)]
    pub manipulators: ManipulatorConfig,
}

fn default_cycle_time_ms() -> u32 {
    CYCLE_TIME_MS
}
fn default_debounce_window() -> u32 {
    DEBOUNCE_WINDOW_TICKS
}

impl Default for ControlUnitConfig {
    fn default() -> Self {
        Self {
            shared: SharedConfig::default(),
            cycle_time_ms: CYCLE_TIME_MS,
            debounce_window_ticks: DEBOUNCE_WINDOW_TICKS,
            pressure: PressureConfig::default(),
            match_clock: MatchClockConfig::default(),
            cylinders: CylindersConfig::default(),
            manipulators: ManipulatorConfig::default(),
        }
    }
}

impl ControlUnitConfig {
    /// Validate parameter bounds across all sections.
    pub fn validate(&self) -> Result<(), String> {
        self.shared.validate().map_err(|e| e.to_string())?;
        if self.cycle_time_ms < CYCLE_TIME_MS_MIN || self.cycle_time_ms > CYCLE_TIME_MS_MAX {
            return Err(format!(
                "cycle_time_ms {} out of range [{}, {}]",
                self.cycle_time_ms, CYCLE_TIME_MS_MIN, CYCLE_TIME_MS_MAX
            ));
        }
        if self.debounce_window_ticks > DEBOUNCE_WINDOW_TICKS_MAX {
            return Err(format!(
                "debounce_window_ticks {} out of range [0, {}]",
                self.debounce_window_ticks, DEBOUNCE_WINDOW_TICKS_MAX
            ));
        }
        self.pressure.validate()?;
        self.match_clock.validate()?;
        self.cylinders.validate()?;
        self.manipulators.validate()?;
        Ok(())
    }

    /// Control-loop period as a `Duration`.
    pub fn cycle_time(&self) -> std::time::Duration {
        std::time::Duration::from_millis(u64::from(self.cycle_time_ms))
    }
}

// ─── Pressure ───────────────────────────────────────────────────────

/// Tank pressure gate configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PressureConfig {
    /// Sensor voltage at or above which the tanks count as charged.
    #[serde(default = "default_threshold_volts")]
    pub threshold_volts: f64,
}

fn default_threshold_volts() -> f64 {
    PRESSURE_THRESHOLD_VOLTS
}

impl Default for PressureConfig {
    fn default() -> Self {
        Self {
            threshold_volts: PRESSURE_THRESHOLD_VOLTS,
        }
    }
}

impl PressureConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !(self.threshold_volts > 0.0 && self.threshold_volts <= PRESSURE_SENSOR_MAX_VOLTS) {
            return Err(format!(
                "pressure.threshold_volts {} out of range (0, {}]",
                self.threshold_volts, PRESSURE_SENSOR_MAX_VOLTS
            ));
        }
        Ok(())
    }
}

// ─── Match Clock ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchClockConfig {
    /// Elapsed seconds after which `climb_now` latches.
    #[serde(default = "default_climb_after")]
    pub climb_after_s: f64,
}

fn default_climb_after() -> f64 {
    CLIMB_AFTER_S
}

impl Default for MatchClockConfig {
    fn default() -> Self {
        Self {
            climb_after_s: CLIMB_AFTER_S,
        }
    }
}

impl MatchClockConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !(CLIMB_AFTER_S_MIN..=CLIMB_AFTER_S_MAX).contains(&self.climb_after_s) {
            return Err(format!(
                "match_clock.climb_after_s {} out of range [{}, {}]",
                self.climb_after_s, CLIMB_AFTER_S_MIN, CLIMB_AFTER_S_MAX
            ));
        }
        Ok(())
    }
}

// ─── Cylinders ──────────────────────────────────────────────────────

/// One instantiation of the cylinder template.
///
/// `dwell_s = None` selects the reduced variant with no stroke states;
/// `debounced = false` lets command and release fire on the raw edge.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CylinderConfig {
    /// Joystick button (1-based).
    pub button: u8,
    /// Solenoid channel.
    pub channel: u8,
    /// Open-loop stroke time [s].
    #[serde(default)]
    pub dwell_s: Option<f64>,
    /// Require the pressure gate before firing a command.
    #[serde(default)]
    pub gated_on_pressure: bool,
    /// Debounce command and release edges.
    #[serde(default = "default_true")]
    pub debounced: bool,
}

fn default_true() -> bool {
    true
}

impl CylinderConfig {
    /// Gated, debounced lift cylinder with the standard dwell.
    pub const fn lift(button: u8, channel: u8) -> Self {
        Self {
            button,
            channel,
            dwell_s: Some(LIFT_DWELL_S),
            gated_on_pressure: true,
            debounced: true,
        }
    }

    /// Ungated, undebounced, dwell-free gateway flap.
    pub const fn gateway(button: u8, channel: u8) -> Self {
        Self {
            button,
            channel,
            dwell_s: None,
            gated_on_pressure: false,
            debounced: false,
        }
    }

    pub fn validate(&self, name: &str) -> Result<(), String> {
        if self.button == 0 || self.button > MAX_BUTTON {
            return Err(format!(
                "cylinders.{name}.button {} out of range [1, {}]",
                self.button, MAX_BUTTON
            ));
        }
        if self.channel >= SOLENOID_CHANNELS {
            return Err(format!(
                "cylinders.{name}.channel {} out of range [0, {}]",
                self.channel,
                SOLENOID_CHANNELS - 1
            ));
        }
        if let Some(dwell) = self.dwell_s
            && !(DWELL_S_MIN..=DWELL_S_MAX).contains(&dwell)
        {
            return Err(format!(
                "cylinders.{name}.dwell_s {dwell} out of range [{DWELL_S_MIN}, {DWELL_S_MAX}]"
            ));
        }
        Ok(())
    }
}

/// The three pneumatic actuators on the robot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CylindersConfig {
    #[serde(default = "default_front_lift")]
    pub front_lift: CylinderConfig,
    #[serde(default = "default_rear_lift")]
    pub rear_lift: CylinderConfig,
    #[serde(default = "default_ball_gateway")]
    pub ball_gateway: CylinderConfig,
}

fn default_front_lift() -> CylinderConfig {
    CylinderConfig::lift(FRONT_LIFT_BUTTON, FRONT_LIFT_CHANNEL)
}
fn default_rear_lift() -> CylinderConfig {
    CylinderConfig::lift(REAR_LIFT_BUTTON, REAR_LIFT_CHANNEL)
}
fn default_ball_gateway() -> CylinderConfig {
    CylinderConfig::gateway(BALL_GATEWAY_BUTTON, BALL_GATEWAY_CHANNEL)
}

impl Default for CylindersConfig {
    fn default() -> Self {
        Self {
            front_lift: default_front_lift(),
            rear_lift: default_rear_lift(),
            ball_gateway: default_ball_gateway(),
        }
    }
}

impl CylindersConfig {
    /// Named view used for validation and logging.
    pub fn entries(&self) -> [(&'static str, &CylinderConfig); 3] {
        [
            ("front_lift", &self.front_lift),
            ("rear_lift", &self.rear_lift),
            ("ball_gateway", &self.ball_gateway),
        ]
    }

    pub fn validate(&self) -> Result<(), String> {
        let entries = self.entries();
        for (name, cylinder) in entries {
            cylinder.validate(name)?;
        }
        for (i, (a_name, a)) in entries.iter().enumerate() {
            for (b_name, b) in entries.iter().skip(i + 1) {
                if a.channel == b.channel {
                    return Err(format!(
                        "cylinders.{a_name} and cylinders.{b_name} share solenoid channel {}",
                        a.channel
                    ));
                }
                if a.button == b.button {
                    return Err(format!(
                        "cylinders.{a_name} and cylinders.{b_name} share button {}",
                        a.button
                    ));
                }
            }
        }
        Ok(())
    }
}

// ─── Manipulators ───────────────────────────────────────────────────

/// Winch and ball-intake motor settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManipulatorConfig {
    #[serde(default = "default_winch_up")]
    pub winch_up_button: u8,
    #[serde(default = "default_winch_down")]
    pub winch_down_button: u8,
    #[serde(default = "default_winch_speed")]
    pub winch_max_speed: f64,
    #[serde(default = "default_intake_speed")]
    pub intake_max_speed: f64,
    #[serde(default = "default_deadband")]
    pub deadband: f64,
}

fn default_winch_up() -> u8 {
    WINCH_UP_BUTTON
}
fn default_winch_down() -> u8 {
    WINCH_DOWN_BUTTON
}
fn default_winch_speed() -> f64 {
    WINCH_MAX_SPEED
}
fn default_intake_speed() -> f64 {
    INTAKE_MAX_SPEED
}
fn default_deadband() -> f64 {
    DEADBAND
}

impl Default for ManipulatorConfig {
    fn default() -> Self {
        Self {
            winch_up_button: WINCH_UP_BUTTON,
            winch_down_button: WINCH_DOWN_BUTTON,
            winch_max_speed: WINCH_MAX_SPEED,
            intake_max_speed: INTAKE_MAX_SPEED,
            deadband: DEADBAND,
        }
    }
}

impl ManipulatorConfig {
    pub fn validate(&self) -> Result<(), String> {
        for (name, button) in [
            ("winch_up_button", self.winch_up_button),
            ("winch_down_button", self.winch_down_button),
        ] {
            if button == 0 || button > MAX_BUTTON {
                return Err(format!(
                    "manipulators.{name} {button} out of range [1, {MAX_BUTTON}]"
                ));
            }
        }
        if self.winch_up_button == self.winch_down_button {
            return Err("manipulators: winch up and down share a button".to_string());
        }
        for (name, speed) in [
            ("winch_max_speed", self.winch_max_speed),
            ("intake_max_speed", self.intake_max_speed),
        ] {
            if !(0.0..=1.0).contains(&speed) {
                return Err(format!("manipulators.{name} {speed} out of range [0, 1]"));
            }
        }
        if !(0.0..=DEADBAND_MAX).contains(&self.deadband) {
            return Err(format!(
                "manipulators.deadband {} out of range [0, {DEADBAND_MAX}]",
                self.deadband
            ));
        }
        Ok(())
    }
}
