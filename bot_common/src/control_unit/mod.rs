//! Control-unit shared types.
//!
//! Organized by domain: state enums, configuration structures and the
//! per-tick input/output snapshots exchanged with hardware collaborators.

pub mod config;
pub mod io;
pub mod state;
