//! # Robot Control Unit Library
//!
//! Fixed-rate scan controller for a pneumatic competition robot. Each tick
//! samples buttons and the tank pressure sensor, advances the actuator state
//! machines and produces one set of actuator commands.
//!
//! ## Scan Order
//!
//! 1. **PressureSupervisor**: debounced tank-pressure gate
//! 2. **CylinderController** ×3: front lift, rear lift, ball gateway
//! 3. **Winch / Intake**: direct-drive manipulators
//! 4. **MatchClock**: "time to climb" latch, ticked in every mode
//!
//! The pressure gate is recomputed before any gated cylinder reads it within
//! the same tick. Machines never read a clock or a joystick themselves; the
//! orchestrator hands each one the values it needs.

pub mod config;
pub mod cycle;
pub mod debounce;
pub mod io;
pub mod manipulator;
pub mod sim;
pub mod state;
