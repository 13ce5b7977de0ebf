//! Prelude module for common re-exports.
//!
//! ```rust
//! use bot_common::prelude::*;
//! ```

// ─── Logging ────────────────────────────────────────────────────────
pub use crate::config::LogLevel;

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{ConfigError, ConfigLoader, SharedConfig};
pub use crate::control_unit::config::{
    ControlUnitConfig, CylinderConfig, CylindersConfig, ManipulatorConfig, MatchClockConfig,
    PressureConfig,
};

// ─── System Constants ───────────────────────────────────────────────
pub use crate::consts::{CYCLE_TIME_MS, DEBOUNCE_WINDOW_TICKS};

// ─── State ──────────────────────────────────────────────────────────
pub use crate::control_unit::state::{
    ClockState, CylinderPosition, CylinderState, PressureState, RobotMode,
};

// ─── I/O ────────────────────────────────────────────────────────────
pub use crate::control_unit::io::{ButtonSet, ControlInputs, ControlOutputs, ControlSnapshot};

// ─── Time ───────────────────────────────────────────────────────────
pub use crate::time::Stopwatch;

