//! Tick-driven stopwatch.
//!
//! Timers never read a clock themselves. Every operation takes the tick
//! timestamp (`now`, a monotonic [`Duration`] since an arbitrary epoch), so a
//! state machine fed a synthetic timeline behaves exactly like one fed the
//! wall clock.

use std::time::Duration;

/// Reset/start/stop/elapsed timer measured against tick timestamps.
///
/// Mirrors a match-timer handle: `reset` zeroes accumulated time without
/// changing run state, `start` begins accumulating, `stop` freezes the value.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Stopwatch {
    accumulated: Duration,
    started_at: Option<Duration>,
}

impl Stopwatch {
    /// A stopped stopwatch reading zero.
    pub const fn new() -> Self {
        Self {
            accumulated: Duration::ZERO,
            started_at: None,
        }
    }

    /// Zero the accumulated time. A running stopwatch keeps running from `now`.
    pub fn reset(&mut self, now: Duration) {
        self.accumulated = Duration::ZERO;
        if self.started_at.is_some() {
            self.started_at = Some(now);
        }
    }

    /// Begin accumulating. No-op if already running.
    pub fn start(&mut self, now: Duration) {
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
    }

    /// Freeze the accumulated time.
    pub fn stop(&mut self, now: Duration) {
        if let Some(started) = self.started_at.take() {
            self.accumulated += now.saturating_sub(started);
        }
    }

    /// Reset and start in one step.
    pub fn restart(&mut self, now: Duration) {
        self.accumulated = Duration::ZERO;
        self.started_at = Some(now);
    }

    /// Stop and zero.
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    #[inline]
    pub const fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    /// Elapsed time as of `now`.
    pub fn elapsed(&self, now: Duration) -> Duration {
        match self.started_at {
            Some(started) => self.accumulated + now.saturating_sub(started),
            None => self.accumulated,
        }
    }

    /// Elapsed time as of `now`, in seconds.
    #[inline]
    pub fn elapsed_secs(&self, now: Duration) -> f64 {
        self.elapsed(now).as_secs_f64()
    }
}
