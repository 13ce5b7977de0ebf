//! Tick orchestrator and cycle runner.
//!
//! [`RobotCycle`] owns every machine and runs them in scan order once per
//! tick. [`CycleRunner`] wraps it with the collaborators (inputs, outputs,
//! dashboard, clock), measures each tick and optionally paces the loop to the
//! configured period.
//!
//! ## Tick Body
//! Read inputs → apply a pending segment change → scan machines → write
//! outputs → publish changed dashboard values.
//!
//! Overruns are counted and logged, never fatal: a late tick is still a valid
//! tick because every machine measures time from the tick timestamp.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use bot_common::control_unit::config::ControlUnitConfig;
use bot_common::control_unit::io::{ControlInputs, ControlOutputs, ControlSnapshot};
use bot_common::control_unit::state::RobotMode;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::io::{Dashboard, InputSource, MonotonicClock, OutputSink};
use crate::manipulator::{Intake, Winch};
use crate::state::cylinder::CylinderController;
use crate::state::match_clock::MatchClock;
use crate::state::pressure::PressureSupervisor;

// ─── Dashboard Keys ─────────────────────────────────────────────────

pub const KEY_MODE: &str = "Mode";
pub const KEY_PRESSURE_OK: &str = "PressureOK";
pub const KEY_FRONT_LIFT: &str = "FrontLift";
pub const KEY_REAR_LIFT: &str = "RearLift";
pub const KEY_BALL_GATEWAY: &str = "BallGateway";
pub const KEY_CLIMB: &str = "Climb";
pub const KEY_WINCH_COUNT: &str = "WinchCount";
pub const KEY_BALL_INTAKE: &str = "BallIntake";

// ─── Robot Cycle ────────────────────────────────────────────────────

/// All control-unit machines, scanned in a fixed order.
#[derive(Debug, Clone)]
pub struct RobotCycle {
    mode: RobotMode,
    pressure: PressureSupervisor,
    front_lift: CylinderController,
    rear_lift: CylinderController,
    ball_gateway: CylinderController,
    winch: Winch,
    intake: Intake,
    clock: MatchClock,
    intake_speed: f64,
    published: Option<ControlSnapshot>,
}

impl RobotCycle {
    /// Build every machine from `config` and arm the cylinders.
    ///
    /// Starts `Disabled`; nothing is scanned until [`begin_segment`](Self::begin_segment).
    pub fn new(config: &ControlUnitConfig) -> Self {
        let window = config.debounce_window_ticks;
        let cylinders = &config.cylinders;
        let mut cycle = Self {
            mode: RobotMode::Disabled,
            pressure: PressureSupervisor::new(config.pressure.threshold_volts, window),
            front_lift: CylinderController::new("front_lift", &cylinders.front_lift, window),
            rear_lift: CylinderController::new("rear_lift", &cylinders.rear_lift, window),
            ball_gateway: CylinderController::new("ball_gateway", &cylinders.ball_gateway, window),
            winch: Winch::from_config(&config.manipulators),
            intake: Intake::from_config(&config.manipulators),
            clock: MatchClock::new(config.match_clock.climb_after_s),
            intake_speed: 0.0,
            published: None,
        };
        cycle.initialize_actuators();
        cycle
    }

    /// Enter a match segment.
    ///
    /// `Autonomous` and `Test` start a fresh segment: cylinders re-armed
    /// retracted, pressure gate closed, match clock restarted. `Teleop`
    /// continues the running segment. `Disabled` stops actuator scanning.
    ///
    /// Must not be called while a cylinder is mid-stroke; re-arming abandons
    /// the dwell.
    pub fn begin_segment(&mut self, mode: RobotMode) {
        info!(from = self.mode.name(), to = mode.name(), "segment change");
        if mode.starts_segment() {
            self.initialize_actuators();
            self.pressure.reset();
            self.clock.start_match_clock();
        }
        self.mode = mode;
    }

    fn initialize_actuators(&mut self) {
        self.front_lift.initialize();
        self.rear_lift.initialize();
        self.ball_gateway.initialize();
    }

    /// Run one tick and publish any dashboard values that changed.
    pub fn tick<D: Dashboard + ?Sized>(
        &mut self,
        inputs: &ControlInputs,
        dashboard: &mut D,
    ) -> ControlOutputs {
        let mut outputs = ControlOutputs::default();

        if self.mode.is_enabled() {
            // Gate first: gated cylinders read it in the same tick.
            let ready = self.pressure.tick(inputs.pressure_volts);
            self.front_lift.tick(inputs.now, inputs.buttons, ready);
            self.rear_lift.tick(inputs.now, inputs.buttons, ready);
            self.ball_gateway.tick(inputs.now, inputs.buttons, ready);
            outputs.winch_speed = self.winch.tick(inputs.buttons);
            self.intake_speed = self.intake.speed(inputs.intake_axis);
            outputs.intake_speed = self.intake_speed;
        } else {
            self.intake_speed = 0.0;
        }

        let climb_now = self.clock.tick(inputs.now);

        outputs.front_lift = self.front_lift.commanded_position();
        outputs.rear_lift = self.rear_lift.commanded_position();
        outputs.ball_gateway = self.ball_gateway.commanded_position();
        outputs.pressure_ready = self.pressure.pressure_ready();
        outputs.climb_now = climb_now;

        self.publish(dashboard);
        outputs
    }

    /// Observable state after the last tick.
    pub fn snapshot(&self) -> ControlSnapshot {
        ControlSnapshot {
            mode: self.mode,
            pressure: self.pressure.state(),
            pressure_ready: self.pressure.pressure_ready(),
            front_lift: self.front_lift.state(),
            rear_lift: self.rear_lift.state(),
            ball_gateway: self.ball_gateway.state(),
            clock: self.clock.state(),
            climb_now: self.clock.climb_now(),
            winch_count: self.winch.count(),
            intake_speed: self.intake_speed,
        }
    }

    fn publish<D: Dashboard + ?Sized>(&mut self, dashboard: &mut D) {
        let current = self.snapshot();
        let previous = self.published;

        if previous.map(|p| p.mode) != Some(current.mode) {
            dashboard.put_str(KEY_MODE, current.mode.name());
        }
        if previous.map(|p| p.pressure_ready) != Some(current.pressure_ready) {
            dashboard.put_bool(KEY_PRESSURE_OK, current.pressure_ready);
        }
        if previous.map(|p| p.front_lift.label()) != Some(current.front_lift.label()) {
            dashboard.put_str(KEY_FRONT_LIFT, current.front_lift.label());
        }
        if previous.map(|p| p.rear_lift.label()) != Some(current.rear_lift.label()) {
            dashboard.put_str(KEY_REAR_LIFT, current.rear_lift.label());
        }
        if previous.map(|p| p.ball_gateway.label()) != Some(current.ball_gateway.label()) {
            dashboard.put_str(KEY_BALL_GATEWAY, current.ball_gateway.label());
        }
        if previous.map(|p| p.climb_now) != Some(current.climb_now) {
            dashboard.put_bool(KEY_CLIMB, current.climb_now);
        }
        if previous.map(|p| p.winch_count) != Some(current.winch_count) {
            dashboard.put_number(KEY_WINCH_COUNT, f64::from(current.winch_count));
        }
        if previous.map(|p| p.intake_speed) != Some(current.intake_speed) {
            dashboard.put_number(KEY_BALL_INTAKE, current.intake_speed);
        }

        self.published = Some(current);
    }

    #[inline]
    pub const fn mode(&self) -> RobotMode {
        self.mode
    }

    pub fn pressure(&self) -> &PressureSupervisor {
        &self.pressure
    }

    pub fn pressure_mut(&mut self) -> &mut PressureSupervisor {
        &mut self.pressure
    }

    pub fn front_lift(&self) -> &CylinderController {
        &self.front_lift
    }

    pub fn front_lift_mut(&mut self) -> &mut CylinderController {
        &mut self.front_lift
    }

    pub fn rear_lift(&self) -> &CylinderController {
        &self.rear_lift
    }

    pub fn rear_lift_mut(&mut self) -> &mut CylinderController {
        &mut self.rear_lift
    }

    pub fn ball_gateway(&self) -> &CylinderController {
        &self.ball_gateway
    }

    pub fn ball_gateway_mut(&mut self) -> &mut CylinderController {
        &mut self.ball_gateway
    }

    pub fn match_clock(&self) -> &MatchClock {
        &self.clock
    }

    pub fn match_clock_mut(&mut self) -> &mut MatchClock {
        &mut self.clock
    }

    pub fn winch(&self) -> &Winch {
        &self.winch
    }

    /// Cylinders in scan order.
    pub fn cylinders(&self) -> [&CylinderController; 3] {
        [&self.front_lift, &self.rear_lift, &self.ball_gateway]
    }
}

// ─── Cycle Statistics ───────────────────────────────────────────────

/// O(1) per-cycle timing statistics.
#[derive(Debug, Clone)]
pub struct CycleStats {
    /// Total cycles executed.
    pub cycle_count: u64,
    /// Last cycle duration [ns].
    pub last_cycle_ns: u64,
    /// Minimum cycle duration [ns].
    pub min_cycle_ns: u64,
    /// Maximum cycle duration [ns].
    pub max_cycle_ns: u64,
    /// Running sum for average computation.
    pub sum_cycle_ns: u128,
    /// Cycles whose body took longer than the period.
    pub overruns: u64,
    /// Maximum wake-up latency [ns] when pacing.
    pub max_latency_ns: u64,
}

impl Default for CycleStats {
    fn default() -> Self {
        Self::new()
    }
}

impl CycleStats {
    pub const fn new() -> Self {
        Self {
            cycle_count: 0,
            last_cycle_ns: 0,
            min_cycle_ns: u64::MAX,
            max_cycle_ns: 0,
            sum_cycle_ns: 0,
            overruns: 0,
            max_latency_ns: 0,
        }
    }

    /// Record a cycle duration. O(1), no allocation.
    #[inline]
    pub fn record(&mut self, duration_ns: u64, latency_ns: u64) {
        self.cycle_count += 1;
        self.last_cycle_ns = duration_ns;
        self.min_cycle_ns = self.min_cycle_ns.min(duration_ns);
        self.max_cycle_ns = self.max_cycle_ns.max(duration_ns);
        self.sum_cycle_ns += u128::from(duration_ns);
        self.max_latency_ns = self.max_latency_ns.max(latency_ns);
    }

    /// Average cycle time [ns] (returns 0 if no cycles).
    #[inline]
    pub fn avg_cycle_ns(&self) -> u64 {
        if self.cycle_count == 0 {
            0
        } else {
            (self.sum_cycle_ns / u128::from(self.cycle_count)) as u64
        }
    }
}

fn as_nanos(d: Duration) -> u64 {
    u64::try_from(d.as_nanos()).unwrap_or(u64::MAX)
}

// ─── Cycle Runner ───────────────────────────────────────────────────

/// Errors starting or running the cycle.
#[derive(Debug, Error)]
pub enum CycleError {
    /// Configuration rejected by validation.
    #[error("invalid control unit configuration: {0}")]
    Config(String),
}

/// Drives a [`RobotCycle`] against its collaborators.
pub struct CycleRunner<I, O, D, C> {
    cycle: RobotCycle,
    inputs: I,
    outputs: O,
    dashboard: D,
    clock: C,
    period: Duration,
    realtime: bool,
    next_wake: Option<Instant>,
    stats: CycleStats,
    last_outputs: ControlOutputs,
}

impl<I, O, D, C> CycleRunner<I, O, D, C>
where
    I: InputSource,
    O: OutputSink,
    D: Dashboard,
    C: MonotonicClock,
{
    /// Validate `config` and build the cycle. Pacing is off by default.
    pub fn new(
        config: &ControlUnitConfig,
        inputs: I,
        outputs: O,
        dashboard: D,
        clock: C,
    ) -> Result<Self, CycleError> {
        config.validate().map_err(CycleError::Config)?;
        Ok(Self {
            cycle: RobotCycle::new(config),
            inputs,
            outputs,
            dashboard,
            clock,
            period: config.cycle_time(),
            realtime: false,
            next_wake: None,
            stats: CycleStats::new(),
            last_outputs: ControlOutputs::default(),
        })
    }

    /// Sleep between ticks so the loop runs at the configured period.
    pub fn with_realtime(mut self, realtime: bool) -> Self {
        self.realtime = realtime;
        self
    }

    /// Run exactly one tick.
    pub fn step(&mut self) -> ControlOutputs {
        let started = Instant::now();

        let now = self.clock.now();
        let inputs = self.inputs.read(now);
        if let Some(mode) = self.inputs.segment_change() {
            self.cycle.begin_segment(mode);
        }
        let outputs = self.cycle.tick(&inputs, &mut self.dashboard);
        self.outputs.write(&outputs);
        self.last_outputs = outputs;

        let elapsed = started.elapsed();
        if elapsed > self.period {
            self.stats.overruns += 1;
            warn!(
                cycle = self.stats.cycle_count,
                elapsed_us = elapsed.as_micros() as u64,
                budget_us = self.period.as_micros() as u64,
                "cycle overrun"
            );
        }
        let latency = self.pace();
        self.stats.record(as_nanos(elapsed), as_nanos(latency));
        outputs
    }

    /// Run up to `ticks` ticks, stopping early when the inputs run out.
    /// Returns the number of ticks executed.
    pub fn run_for(&mut self, ticks: u64) -> u64 {
        self.run_loop(None, Some(ticks))
    }

    /// Run until `running` is cleared or the inputs run out.
    /// Returns the number of ticks executed.
    pub fn run_until(&mut self, running: &AtomicBool) -> u64 {
        self.run_loop(Some(running), None)
    }

    /// [`run_until`](Self::run_until) with an upper bound on the tick count.
    pub fn run_until_limit(&mut self, running: &AtomicBool, ticks: u64) -> u64 {
        self.run_loop(Some(running), Some(ticks))
    }

    fn run_loop(&mut self, running: Option<&AtomicBool>, limit: Option<u64>) -> u64 {
        let mut executed = 0;
        loop {
            if limit.is_some_and(|limit| executed >= limit)
                || running.is_some_and(|flag| !flag.load(Ordering::SeqCst))
                || self.inputs.is_exhausted()
            {
                break;
            }
            self.step();
            executed += 1;
        }
        debug!(executed, "cycle loop stopped");
        executed
    }

    /// Sleep until the next period boundary. Returns how late the wake-up was.
    fn pace(&mut self) -> Duration {
        if !self.realtime {
            return Duration::ZERO;
        }
        let now = Instant::now();
        let deadline = match self.next_wake {
            Some(deadline) => deadline,
            None => now + self.period,
        };
        if deadline > now {
            std::thread::sleep(deadline - now);
            self.next_wake = Some(deadline + self.period);
            Instant::now().saturating_duration_since(deadline)
        } else {
            // Fell behind by more than a period: resynchronize instead of bursting.
            let behind = now - deadline;
            self.next_wake = Some(now + self.period);
            behind
        }
    }

    pub fn cycle(&self) -> &RobotCycle {
        &self.cycle
    }

    pub fn cycle_mut(&mut self) -> &mut RobotCycle {
        &mut self.cycle
    }

    pub fn stats(&self) -> &CycleStats {
        &self.stats
    }

    pub fn dashboard(&self) -> &D {
        &self.dashboard
    }

    pub fn outputs(&self) -> &O {
        &self.outputs
    }

    pub fn inputs(&self) -> &I {
        &self.inputs
    }

    /// Outputs produced by the most recent tick.
    pub fn last_outputs(&self) -> &ControlOutputs {
        &self.last_outputs
    }

    #[inline]
    pub const fn period(&self) -> Duration {
        self.period
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
