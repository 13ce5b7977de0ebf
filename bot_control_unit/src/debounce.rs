//! Consecutive-tick debounce for digital and analog inputs.
//!
//! A [`DebouncedFlag`] counts how many ticks in a row a condition has held.
//! It reports a decision on the tick the count first exceeds its window and
//! restarts counting from zero on that same tick, so it is a one-shot per
//! settling rather than a sticky level. With the default window of 10 and a
//! 20 ms tick, a held button settles after 11 ticks (220 ms).
//!
//! Each logical edge owns its own flag: the "extend command" and "release"
//! edges of a cylinder never share a counter.

use bot_common::consts::DEBOUNCE_WINDOW_TICKS;

// ─── Digital ────────────────────────────────────────────────────────

/// Counter that fires once per run of `window + 1` qualifying ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebouncedFlag {
    stable_count: u32,
    window: u32,
}

impl Default for DebouncedFlag {
    fn default() -> Self {
        Self::new(DEBOUNCE_WINDOW_TICKS)
    }
}

impl DebouncedFlag {
    /// Flag firing after `window + 1` consecutive qualifying ticks.
    /// A window of 0 fires on the first qualifying tick (raw edge).
    pub const fn new(window: u32) -> Self {
        Self {
            stable_count: 0,
            window,
        }
    }

    /// Flag that passes the raw condition through.
    pub const fn immediate() -> Self {
        Self::new(0)
    }

    /// Feed one tick. Returns true only on the settling tick.
    #[inline]
    pub fn observe(&mut self, qualifying: bool) -> bool {
        if !qualifying {
            self.stable_count = 0;
            return false;
        }
        self.stable_count = self.stable_count.saturating_add(1);
        if self.stable_count > self.window {
            self.stable_count = 0;
            true
        } else {
            false
        }
    }

    /// Forget any partial run.
    #[inline]
    pub fn reset(&mut self) {
        self.stable_count = 0;
    }

    #[inline]
    pub const fn stable_count(&self) -> u32 {
        self.stable_count
    }

    #[inline]
    pub const fn window(&self) -> u32 {
        self.window
    }
}

// ─── Analog ─────────────────────────────────────────────────────────

/// Which side of the threshold qualifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThresholdDirection {
    /// `sample >= level`
    AtOrAbove,
    /// `sample < level`
    Below,
}

/// Debounced comparison of an analog sample against a fixed level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalogThreshold {
    level: f64,
    direction: ThresholdDirection,
    flag: DebouncedFlag,
}

impl AnalogThreshold {
    pub const fn new(level: f64, direction: ThresholdDirection, window: u32) -> Self {
        Self {
            level,
            direction,
            flag: DebouncedFlag::new(window),
        }
    }

    /// Whether a single sample qualifies, without touching the counter.
    /// NaN never qualifies.
    #[inline]
    pub fn qualifies(&self, sample: f64) -> bool {
        match self.direction {
            ThresholdDirection::AtOrAbove => sample >= self.level,
            ThresholdDirection::Below => sample < self.level,
        }
    }

    /// Feed one sample. Returns true on the settling tick.
    #[inline]
    pub fn observe(&mut self, sample: f64) -> bool {
        let qualifying = self.qualifies(sample);
        self.flag.observe(qualifying)
    }

    #[inline]
    pub fn reset(&mut self) {
        self.flag.reset();
    }

    #[inline]
    pub const fn level(&self) -> f64 {
        self.level
    }

    #[inline]
    pub const fn stable_count(&self) -> u32 {
        self.flag.stable_count()
    }
}
