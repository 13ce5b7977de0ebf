//! Pneumatic cylinder extend/retract controller.
//!
//! One template drives every cylinder on the robot. A press extends, a second
//! press retracts, and the button must be released in between. Each command
//! optionally waits out an open-loop stroke time (dwell) before accepting the
//! release, and optionally requires the pressure gate.
//!
//! ```text
//!   AwaitExtendCmd ──cmd──▶ Extending ──dwell──▶ AwaitExtendRelease
//!         ▲                                             │ release
//!         │ release                                     ▼
//!   AwaitRetractRelease ◀──dwell── Retracting ◀──cmd── AwaitRetractCmd
//! ```
//!
//! Without a dwell the `Extending`/`Retracting` states are skipped. Without
//! debouncing every edge fires on the first qualifying tick.

use std::time::Duration;

use bot_common::control_unit::config::CylinderConfig;
use bot_common::control_unit::io::ButtonSet;
use bot_common::control_unit::state::{CylinderPosition, CylinderState};
use bot_common::time::Stopwatch;
use tracing::{debug, warn};

use crate::debounce::DebouncedFlag;

/// Per-edge debounce counters. Each is reset when its waiting state is entered.
#[derive(Debug, Clone, Copy)]
struct EdgeFlags {
    extend_cmd: DebouncedFlag,
    extend_release: DebouncedFlag,
    retract_cmd: DebouncedFlag,
    retract_release: DebouncedFlag,
}

impl EdgeFlags {
    const fn new(window: u32) -> Self {
        Self {
            extend_cmd: DebouncedFlag::new(window),
            extend_release: DebouncedFlag::new(window),
            retract_cmd: DebouncedFlag::new(window),
            retract_release: DebouncedFlag::new(window),
        }
    }

    fn reset(&mut self) {
        self.extend_cmd.reset();
        self.extend_release.reset();
        self.retract_cmd.reset();
        self.retract_release.reset();
    }
}

/// Extend/retract state machine for one cylinder.
#[derive(Debug, Clone)]
pub struct CylinderController {
    name: &'static str,
    button: u8,
    channel: u8,
    dwell_s: Option<f64>,
    gated_on_pressure: bool,
    state: CylinderState,
    stopwatch: Stopwatch,
    edges: EdgeFlags,
}

impl CylinderController {
    /// Build a parked (`Idle`) controller. Call [`initialize`](Self::initialize)
    /// before the first match segment.
    ///
    /// `window` is the debounce window used when the cylinder is debounced.
    pub fn new(name: &'static str, config: &CylinderConfig, window: u32) -> Self {
        let window = if config.debounced { window } else { 0 };
        Self {
            name,
            button: config.button,
            channel: config.channel,
            dwell_s: config.dwell_s,
            gated_on_pressure: config.gated_on_pressure,
            state: CylinderState::Idle,
            stopwatch: Stopwatch::new(),
            edges: EdgeFlags::new(window),
        }
    }

    /// Arm the controller: retracted, waiting for the extend command.
    ///
    /// Idempotent. Intended for segment boundaries; calling it mid-stroke
    /// abandons the dwell and commands the cylinder retracted.
    pub fn initialize(&mut self) {
        self.stopwatch.clear();
        self.edges.reset();
        self.transition(CylinderState::AwaitExtendCmd);
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub const fn button(&self) -> u8 {
        self.button
    }

    #[inline]
    pub const fn channel(&self) -> u8 {
        self.channel
    }

    #[inline]
    pub const fn state(&self) -> CylinderState {
        self.state
    }

    #[inline]
    pub const fn state_code(&self) -> u8 {
        self.state as u8
    }

    /// Solenoid command implied by the current state.
    #[inline]
    pub const fn commanded_position(&self) -> CylinderPosition {
        self.state.commanded_position()
    }

    /// Overwrite the state from a raw code (telemetry replay, fault injection).
    ///
    /// An unknown code parks the cylinder in `AwaitExtendCmd`, retracted, with
    /// every debounce counter and the dwell timer cleared.
    pub fn load_state_code(&mut self, code: u8) {
        match CylinderState::from_u8(code) {
            Some(state) => self.state = state,
            None => {
                warn!(
                    machine = self.name,
                    code, "unknown state code, re-arming retracted"
                );
                self.stopwatch.clear();
                self.edges.reset();
                self.state = CylinderState::AwaitExtendCmd;
            }
        }
    }

    /// Run one tick. Returns the commanded position after the tick.
    pub fn tick(
        &mut self,
        now: Duration,
        buttons: ButtonSet,
        pressure_ready: bool,
    ) -> CylinderPosition {
        let pressed = buttons.is_pressed(self.button);
        let command = pressed && (!self.gated_on_pressure || pressure_ready);

        match self.state {
            CylinderState::Idle => {}
            CylinderState::AwaitExtendCmd => {
                if self.edges.extend_cmd.observe(command) {
                    self.begin_stroke(
                        now,
                        CylinderState::Extending,
                        CylinderState::AwaitExtendRelease,
                    );
                }
            }
            CylinderState::Extending => {
                if self.dwell_elapsed(now) {
                    self.stopwatch.stop(now);
                    self.enter_extend_release();
                }
            }
            CylinderState::AwaitExtendRelease => {
                if self.edges.extend_release.observe(!pressed) {
                    self.edges.retract_cmd.reset();
                    self.transition(CylinderState::AwaitRetractCmd);
                }
            }
            CylinderState::AwaitRetractCmd => {
                if self.edges.retract_cmd.observe(command) {
                    self.begin_stroke(
                        now,
                        CylinderState::Retracting,
                        CylinderState::AwaitRetractRelease,
                    );
                }
            }
            CylinderState::Retracting => {
                if self.dwell_elapsed(now) {
                    self.stopwatch.stop(now);
                    self.enter_retract_release();
                }
            }
            CylinderState::AwaitRetractRelease => {
                if self.edges.retract_release.observe(!pressed) {
                    self.edges.extend_cmd.reset();
                    self.transition(CylinderState::AwaitExtendCmd);
                }
            }
        }

        self.commanded_position()
    }

    /// Command accepted: start the dwell, or skip straight to the release
    /// wait when the cylinder has no dwell.
    fn begin_stroke(&mut self, now: Duration, stroking: CylinderState, release: CylinderState) {
        if self.dwell_s.is_some() {
            self.stopwatch.restart(now);
            self.transition(stroking);
        } else if release == CylinderState::AwaitExtendRelease {
            self.enter_extend_release();
        } else {
            self.enter_retract_release();
        }
    }

    fn enter_extend_release(&mut self) {
        self.edges.extend_release.reset();
        self.transition(CylinderState::AwaitExtendRelease);
    }

    fn enter_retract_release(&mut self) {
        self.edges.retract_release.reset();
        self.transition(CylinderState::AwaitRetractRelease);
    }

    fn dwell_elapsed(&self, now: Duration) -> bool {
        match self.dwell_s {
            Some(dwell) => self.stopwatch.elapsed_secs(now) > dwell,
            // A stroke state without a dwell can only come from an injected code.
            None => true,
        }
    }

    fn transition(&mut self, to: CylinderState) {
        if to != self.state {
            debug!(
                machine = self.name,
                from = self.state.name(),
                to = to.name(),
                position = ?to.commanded_position(),
                "transition"
            );
        }
        self.state = to;
    }
}
