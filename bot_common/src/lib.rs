//! Robot Common Library
//!
//! Shared constants, state enums, configuration structures and per-tick I/O
//! snapshot types for the robot control workspace.
//!
//! # Module Structure
//!
//! - [`consts`] - System-wide numeric defaults (tick period, debounce window, ...)
//! - [`config`] - Configuration loading traits and types
//! - [`control_unit`] - State enums, control-unit config and I/O snapshots
//! - [`time`] - Tick-driven stopwatch
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use bot_common::prelude::*;
//!
//! let inputs = ControlInputs::idle(std::time::Duration::ZERO);
//! assert!(!inputs.buttons.is_pressed(4));
//! ```

pub mod config;
pub mod consts;
pub mod control_unit;
pub mod prelude;
pub mod time;
