//! Collaborator interfaces for the control cycle.
//!
//! The cycle never touches hardware directly. It reads one
//! [`ControlInputs`] per tick from an [`InputSource`], writes one
//! [`ControlOutputs`] to an [`OutputSink`], publishes operator values to a
//! [`Dashboard`] and timestamps ticks with a [`MonotonicClock`].

use std::collections::{BTreeMap, VecDeque};
use std::time::{Duration, Instant};

use bot_common::control_unit::io::{ControlInputs, ControlOutputs};
use bot_common::control_unit::state::RobotMode;
use tracing::info;

// ─── Traits ─────────────────────────────────────────────────────────

/// Per-tick input sampling.
pub trait InputSource {
    /// Sample all inputs for the tick stamped `now`.
    fn read(&mut self, now: Duration) -> ControlInputs;

    /// Segment requested by the driver station since the last read, if any.
    fn segment_change(&mut self) -> Option<RobotMode> {
        None
    }

    /// Whether the source has nothing left to play back.
    fn is_exhausted(&self) -> bool {
        false
    }
}

/// Per-tick actuator output.
pub trait OutputSink {
    fn write(&mut self, outputs: &ControlOutputs);
}

/// Operator-facing key/value display.
pub trait Dashboard {
    fn put_bool(&mut self, key: &str, value: bool);
    fn put_str(&mut self, key: &str, value: &str);
    fn put_number(&mut self, key: &str, value: f64);
}

/// Monotonic tick timestamp source.
pub trait MonotonicClock {
    fn now(&mut self) -> Duration;
}

// ─── Inputs ─────────────────────────────────────────────────────────

/// Disconnected driver station: no buttons, no pressure, never exhausted.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdleInputs;

impl InputSource for IdleInputs {
    fn read(&mut self, now: Duration) -> ControlInputs {
        ControlInputs::idle(now)
    }
}

// ─── Clocks ─────────────────────────────────────────────────────────

/// Wall clock measured from construction.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    epoch: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock for SystemClock {
    fn now(&mut self) -> Duration {
        self.epoch.elapsed()
    }
}

/// Synthetic clock advancing one period per reading.
///
/// The first reading returns zero.
#[derive(Debug, Clone, Copy)]
pub struct SimClock {
    next: Duration,
    period: Duration,
}

impl SimClock {
    pub const fn new(period: Duration) -> Self {
        Self {
            next: Duration::ZERO,
            period,
        }
    }

    #[inline]
    pub const fn period(&self) -> Duration {
        self.period
    }
}

impl MonotonicClock for SimClock {
    fn now(&mut self) -> Duration {
        let now = self.next;
        self.next += self.period;
        now
    }
}

// ─── Dashboards ─────────────────────────────────────────────────────

/// Dashboard that emits every published value as a `tracing` event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDashboard;

impl Dashboard for TracingDashboard {
    fn put_bool(&mut self, key: &str, value: bool) {
        info!(target: "dashboard", key, value, "dashboard update");
    }

    fn put_str(&mut self, key: &str, value: &str) {
        info!(target: "dashboard", key, value, "dashboard update");
    }

    fn put_number(&mut self, key: &str, value: f64) {
        info!(target: "dashboard", key, value, "dashboard update");
    }
}

/// A published dashboard value.
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardValue {
    Bool(bool),
    Str(String),
    Number(f64),
}

/// Publish-log entries kept by [`MemoryDashboard::new`].
pub const DEFAULT_DASHBOARD_LOG_LIMIT: usize = 4096;

/// In-memory dashboard keeping the latest value per key and a bounded
/// publish log. Once the log is full the oldest entries are dropped.
#[derive(Debug, Clone)]
pub struct MemoryDashboard {
    values: BTreeMap<String, DashboardValue>,
    log: VecDeque<(String, DashboardValue)>,
    log_limit: usize,
}

impl Default for MemoryDashboard {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDashboard {
    pub fn new() -> Self {
        Self::with_log_limit(DEFAULT_DASHBOARD_LOG_LIMIT)
    }

    /// Dashboard whose publish log keeps at most `limit` entries.
    pub fn with_log_limit(limit: usize) -> Self {
        Self {
            values: BTreeMap::new(),
            log: VecDeque::with_capacity(limit.min(DEFAULT_DASHBOARD_LOG_LIMIT)),
            log_limit: limit,
        }
    }

    pub fn get(&self, key: &str) -> Option<&DashboardValue> {
        self.values.get(key)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.values.get(key) {
            Some(DashboardValue::Bool(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.values.get(key) {
            Some(DashboardValue::Str(v)) => Some(v.as_str()),
            _ => None,
        }
    }

    pub fn get_number(&self, key: &str) -> Option<f64> {
        match self.values.get(key) {
            Some(DashboardValue::Number(v)) => Some(*v),
            _ => None,
        }
    }

    /// Number of retained publishes of `key`.
    pub fn publish_count(&self, key: &str) -> usize {
        self.log.iter().filter(|(k, _)| k == key).count()
    }

    /// Retained publishes, oldest first.
    pub fn log(&self) -> &VecDeque<(String, DashboardValue)> {
        &self.log
    }

    #[inline]
    pub const fn log_limit(&self) -> usize {
        self.log_limit
    }

    fn put(&mut self, key: &str, value: DashboardValue) {
        if self.log_limit > 0 {
            if self.log.len() == self.log_limit {
                self.log.pop_front();
            }
            self.log.push_back((key.to_string(), value.clone()));
        }
        self.values.insert(key.to_string(), value);
    }
}

impl Dashboard for MemoryDashboard {
    fn put_bool(&mut self, key: &str, value: bool) {
        self.put(key, DashboardValue::Bool(value));
    }

    fn put_str(&mut self, key: &str, value: &str) {
        self.put(key, DashboardValue::Str(value.to_string()));
    }

    fn put_number(&mut self, key: &str, value: f64) {
        self.put(key, DashboardValue::Number(value));
    }
}
