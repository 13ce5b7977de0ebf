//! Match clock "time to climb" latch.
//!
//! Started at the beginning of a match segment. Once the segment has run for
//! longer than the climb threshold, `climb_now` latches true and stays true
//! until the next start.

use std::time::Duration;

use bot_common::consts::CLIMB_AFTER_S;
use bot_common::control_unit::state::ClockState;
use bot_common::time::Stopwatch;
use tracing::{debug, info, warn};

/// Match-clock supervisor.
#[derive(Debug, Clone)]
pub struct MatchClock {
    state: ClockState,
    stopwatch: Stopwatch,
    climb_after_s: f64,
    climb_now: bool,
}

impl Default for MatchClock {
    fn default() -> Self {
        Self::new(CLIMB_AFTER_S)
    }
}

impl MatchClock {
    /// Idle clock; nothing happens until [`start_match_clock`](Self::start_match_clock).
    pub const fn new(climb_after_s: f64) -> Self {
        Self {
            state: ClockState::WaitActivation,
            stopwatch: Stopwatch::new(),
            climb_after_s,
            climb_now: false,
        }
    }

    /// Request a restart. The next tick zeroes the stopwatch and clears the latch.
    pub fn start_match_clock(&mut self) {
        self.transition(ClockState::Initialize);
    }

    /// Whether the climb window has opened since the last start.
    #[inline]
    pub const fn climb_now(&self) -> bool {
        self.climb_now
    }

    #[inline]
    pub const fn state(&self) -> ClockState {
        self.state
    }

    #[inline]
    pub const fn state_code(&self) -> u8 {
        self.state as u8
    }

    #[inline]
    pub const fn climb_after_s(&self) -> f64 {
        self.climb_after_s
    }

    /// Seconds since the last start as of `now`.
    pub fn elapsed_secs(&self, now: Duration) -> f64 {
        self.stopwatch.elapsed_secs(now)
    }

    /// Overwrite the state from a raw code. An unknown code idles the clock
    /// with the latch cleared.
    pub fn load_state_code(&mut self, code: u8) {
        match ClockState::from_u8(code) {
            Some(state) => self.state = state,
            None => {
                warn!(machine = "match_clock", code, "unknown state code, idling");
                self.climb_now = false;
                self.state = ClockState::WaitActivation;
            }
        }
    }

    /// Run one tick. Returns `climb_now`.
    pub fn tick(&mut self, now: Duration) -> bool {
        match self.state {
            ClockState::WaitActivation => {}
            ClockState::Initialize => {
                self.stopwatch.restart(now);
                self.climb_now = false;
                self.transition(ClockState::WaitElapsed);
            }
            ClockState::WaitElapsed => {
                let elapsed = self.stopwatch.elapsed_secs(now);
                if elapsed > self.climb_after_s {
                    self.climb_now = true;
                    info!(elapsed_s = elapsed, "climb window open");
                    self.transition(ClockState::WaitActivation);
                }
            }
        }
        self.climb_now
    }

    fn transition(&mut self, to: ClockState) {
        if to != self.state {
            debug!(
                machine = "match_clock",
                from = self.state.name(),
                to = to.name(),
                "transition"
            );
        }
        self.state = to;
    }
}
