//! Simulation I/O: scripted inputs and recorded outputs.
//!
//! A scenario is a TOML list of steps. Each step holds one input pattern for
//! a number of ticks and may request a segment change on its first tick:
//!
//! ```toml
//! name = "lift-cycle"
//!
//! [[steps]]
//! ticks = 15
//! segment = "autonomous"
//! pressure_volts = 2.1
//!
//! [[steps]]
//! ticks = 100
//! buttons = [4]
//! pressure_volts = 2.1
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use bot_common::consts::{MAX_BUTTON, SOLENOID_CHANNELS};
use bot_common::control_unit::config::CylindersConfig;
use bot_common::control_unit::io::{ButtonSet, ControlInputs, ControlOutputs};
use bot_common::control_unit::state::RobotMode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::io::{InputSource, OutputSink};

// ─── Error Type ─────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("failed to read scenario {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("scenario parse error: {0}")]
    Parse(String),

    #[error("invalid scenario: {0}")]
    Invalid(String),
}

// ─── Scenario ───────────────────────────────────────────────────────

/// One input pattern held for `ticks` ticks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioStep {
    pub ticks: u32,
    /// Held buttons (1-based).
    #[serde(default)]
    pub buttons: Vec<u8>,
    #[serde(default)]
    pub pressure_volts: f64,
    #[serde(default)]
    pub intake_axis: f64,
    /// Segment entered on the first tick of this step.
    #[serde(default)]
    pub segment: Option<RobotMode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: String,
    pub steps: Vec<ScenarioStep>,
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let content = std::fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ScenarioError> {
        let scenario: Self =
            toml::from_str(content).map_err(|e| ScenarioError::Parse(e.to_string()))?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn validate(&self) -> Result<(), ScenarioError> {
        if self.steps.is_empty() {
            return Err(ScenarioError::Invalid("no steps".to_string()));
        }
        for (i, step) in self.steps.iter().enumerate() {
            if step.ticks == 0 {
                return Err(ScenarioError::Invalid(format!("step {i}: ticks must be >= 1")));
            }
            if let Some(&button) = step.buttons.iter().find(|&&b| b == 0 || b > MAX_BUTTON) {
                return Err(ScenarioError::Invalid(format!(
                    "step {i}: button {button} out of range [1, {MAX_BUTTON}]"
                )));
            }
            if !step.pressure_volts.is_finite() {
                return Err(ScenarioError::Invalid(format!(
                    "step {i}: pressure_volts must be finite"
                )));
            }
            if !(-1.0..=1.0).contains(&step.intake_axis) {
                return Err(ScenarioError::Invalid(format!(
                    "step {i}: intake_axis {} out of range [-1, 1]",
                    step.intake_axis
                )));
            }
        }
        Ok(())
    }

    /// Total ticks across all steps.
    pub fn total_ticks(&self) -> u64 {
        self.steps.iter().map(|s| u64::from(s.ticks)).sum()
    }
}

// ─── Scripted Inputs ────────────────────────────────────────────────

/// [`InputSource`] that plays back a [`Scenario`] one tick per read.
///
/// Once exhausted, every read returns idle inputs.
#[derive(Debug, Clone)]
pub struct ScriptedInputs {
    scenario: Scenario,
    step: usize,
    tick_in_step: u32,
    pending_segment: Option<RobotMode>,
    reads: u64,
}

impl ScriptedInputs {
    pub fn new(scenario: Scenario) -> Self {
        Self {
            scenario,
            step: 0,
            tick_in_step: 0,
            pending_segment: None,
            reads: 0,
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, ScenarioError> {
        Ok(Self::new(Scenario::load(path)?))
    }

    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    /// Ticks read so far.
    pub fn reads(&self) -> u64 {
        self.reads
    }
}

impl InputSource for ScriptedInputs {
    fn read(&mut self, now: Duration) -> ControlInputs {
        self.reads += 1;
        let Some(step) = self.scenario.steps.get(self.step) else {
            return ControlInputs::idle(now);
        };

        if self.tick_in_step == 0 {
            self.pending_segment = step.segment;
            debug!(step = self.step, ticks = step.ticks, "scenario step");
        }

        let inputs = ControlInputs::idle(now)
            .with_buttons(ButtonSet::from_buttons(&step.buttons))
            .with_pressure(step.pressure_volts)
            .with_intake_axis(step.intake_axis);

        self.tick_in_step += 1;
        if self.tick_in_step >= step.ticks {
            self.step += 1;
            self.tick_in_step = 0;
        }
        inputs
    }

    fn segment_change(&mut self) -> Option<RobotMode> {
        self.pending_segment.take()
    }

    fn is_exhausted(&self) -> bool {
        self.step >= self.scenario.steps.len()
    }
}

// ─── Recorded Outputs ───────────────────────────────────────────────

/// [`OutputSink`] that keeps the latest outputs, a solenoid channel image
/// and the compressor relay level.
#[derive(Debug, Clone)]
pub struct RecordingOutputs {
    channels: [u8; 3],
    solenoids: [bool; SOLENOID_CHANNELS as usize],
    compressor: bool,
    last: Option<ControlOutputs>,
    history: Option<Vec<ControlOutputs>>,
    writes: u64,
}

impl RecordingOutputs {
    /// Map front lift, rear lift and ball gateway onto their configured channels.
    pub fn new(cylinders: &CylindersConfig) -> Self {
        Self {
            channels: [
                cylinders.front_lift.channel,
                cylinders.rear_lift.channel,
                cylinders.ball_gateway.channel,
            ],
            solenoids: [false; SOLENOID_CHANNELS as usize],
            compressor: false,
            last: None,
            history: None,
            writes: 0,
        }
    }

    /// Also keep every write, in order.
    pub fn with_history(mut self) -> Self {
        self.history = Some(Vec::new());
        self
    }

    pub fn last(&self) -> Option<&ControlOutputs> {
        self.last.as_ref()
    }

    pub fn history(&self) -> &[ControlOutputs] {
        self.history.as_deref().unwrap_or(&[])
    }

    pub fn writes(&self) -> u64 {
        self.writes
    }

    /// Level of a solenoid channel. Unknown channels read false.
    pub fn solenoid(&self, channel: u8) -> bool {
        self.solenoids
            .get(usize::from(channel))
            .copied()
            .unwrap_or(false)
    }

    /// Compressor relay level. Off until the first write.
    #[inline]
    pub const fn compressor_enabled(&self) -> bool {
        self.compressor
    }
}

impl OutputSink for RecordingOutputs {
    fn write(&mut self, outputs: &ControlOutputs) {
        let positions = [outputs.front_lift, outputs.rear_lift, outputs.ball_gateway];
        for (&channel, position) in self.channels.iter().zip(positions) {
            if let Some(level) = self.solenoids.get_mut(usize::from(channel)) {
                let on = position.solenoid_on();
                if *level != on {
                    debug!(channel, on, "solenoid");
                }
                *level = on;
            }
        }
        if self.compressor != outputs.compressor_enabled {
            debug!(on = outputs.compressor_enabled, "compressor");
        }
        self.compressor = outputs.compressor_enabled;
        self.last = Some(*outputs);
        if let Some(history) = self.history.as_mut() {
            history.push(*outputs);
        }
        self.writes += 1;
    }
}
