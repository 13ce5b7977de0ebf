//! System-wide constants for the robot control workspace.
//!
//! Single source of truth for tick timing, debounce windows, actuator
//! defaults and config bounds. Imported by all crates.

use static_assertions::const_assert;

// ─── Tick Timing ────────────────────────────────────────────────────

/// Default control-loop period in milliseconds (50 Hz).
pub const CYCLE_TIME_MS: u32 = 20;

/// Lower bound for `cycle_time_ms`.
pub const CYCLE_TIME_MS_MIN: u32 = 5;

/// Upper bound for `cycle_time_ms`.
pub const CYCLE_TIME_MS_MAX: u32 = 100;

// ─── Debounce ───────────────────────────────────────────────────────

/// Consecutive qualifying ticks that must be *exceeded* before a debounced
/// decision fires (10 ⇒ fires on the 11th tick, ≈220 ms at 20 ms/tick).
pub const DEBOUNCE_WINDOW_TICKS: u32 = 10;

/// Upper bound for `debounce_window_ticks`.
pub const DEBOUNCE_WINDOW_TICKS_MAX: u32 = 100;

// ─── Pressure ───────────────────────────────────────────────────────

/// Tank pressure sensor voltage at which the air system counts as charged.
pub const PRESSURE_THRESHOLD_VOLTS: f64 = 2.0;

/// Full-scale voltage of the analog pressure input.
pub const PRESSURE_SENSOR_MAX_VOLTS: f64 = 5.0;

// ─── Cylinders ──────────────────────────────────────────────────────

/// Open-loop time a lift cylinder is given to complete a stroke [s].
pub const LIFT_DWELL_S: f64 = 1.5;

/// Lower bound for a configured dwell [s].
pub const DWELL_S_MIN: f64 = 0.05;

/// Upper bound for a configured dwell [s].
pub const DWELL_S_MAX: f64 = 10.0;

/// Front lift joystick button (1-based).
pub const FRONT_LIFT_BUTTON: u8 = 4;

/// Rear lift joystick button (1-based).
pub const REAR_LIFT_BUTTON: u8 = 5;

/// Ball gateway joystick button (1-based).
pub const BALL_GATEWAY_BUTTON: u8 = 1;

/// Front lift solenoid channel.
pub const FRONT_LIFT_CHANNEL: u8 = 0;

/// Rear lift solenoid channel.
pub const REAR_LIFT_CHANNEL: u8 = 1;

/// Ball gateway solenoid channel.
pub const BALL_GATEWAY_CHANNEL: u8 = 2;

/// Highest joystick button index.
pub const MAX_BUTTON: u8 = 32;

/// Number of solenoid channels on the pneumatics module.
pub const SOLENOID_CHANNELS: u8 = 8;

// ─── Match Clock ────────────────────────────────────────────────────

/// Elapsed match time after which the driver is told to climb [s].
pub const CLIMB_AFTER_S: f64 = 90.0;

/// Lower bound for `climb_after_s`.
pub const CLIMB_AFTER_S_MIN: f64 = 1.0;

/// Upper bound for `climb_after_s`.
pub const CLIMB_AFTER_S_MAX: f64 = 300.0;

// ─── Manipulators ───────────────────────────────────────────────────

/// Winch "wind up" button (1-based).
pub const WINCH_UP_BUTTON: u8 = 3;

/// Winch "pay out" button (1-based).
pub const WINCH_DOWN_BUTTON: u8 = 2;

/// Winch motor magnitude.
pub const WINCH_MAX_SPEED: f64 = 0.75;

/// Ball intake motor magnitude.
pub const INTAKE_MAX_SPEED: f64 = 1.0;

/// Joystick deadband applied to scaled motor commands.
pub const DEADBAND: f64 = 0.05;

/// Upper bound for `deadband`.
pub const DEADBAND_MAX: f64 = 0.5;

// ─── Paths ──────────────────────────────────────────────────────────

/// Default configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "config/robot.toml";

const_assert!(CYCLE_TIME_MS >= CYCLE_TIME_MS_MIN && CYCLE_TIME_MS <= CYCLE_TIME_MS_MAX);
const_assert!(DEBOUNCE_WINDOW_TICKS <= DEBOUNCE_WINDOW_TICKS_MAX);
const_assert!(FRONT_LIFT_BUTTON <= MAX_BUTTON && REAR_LIFT_BUTTON <= MAX_BUTTON);
const_assert!(BALL_GATEWAY_CHANNEL < SOLENOID_CHANNELS);
const_assert!(MAX_BUTTON as u32 <= u32::BITS);
