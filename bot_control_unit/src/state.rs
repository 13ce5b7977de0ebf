//! State machine module root.
//!
//! One module per supervisory machine. Each machine owns its typed state,
//! exposes it as a `u8` code for telemetry, and recovers to its initial state
//! when handed a code outside its enumerated set.

pub mod cylinder;
pub mod match_clock;
pub mod pressure;
