//! State machine enums for the control unit.
//!
//! All enums use `#[repr(u8)]` so a machine's state can travel as a compact
//! code in telemetry snapshots. `from_u8` returns `None` for codes outside the
//! enumerated set; the owning machine treats that as an unreachable state and
//! recovers to its initial state.

use serde::{Deserialize, Serialize};

// ─── Robot Mode ─────────────────────────────────────────────────────

/// Match segment the robot framework is currently running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum RobotMode {
    /// Outputs held, actuators not scanned.
    #[default]
    Disabled = 0,
    /// Autonomous period.
    Autonomous = 1,
    /// Driver-controlled period.
    Teleop = 2,
    /// Pit/practice test mode.
    Test = 3,
}

impl RobotMode {
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Disabled),
            1 => Some(Self::Autonomous),
            2 => Some(Self::Teleop),
            3 => Some(Self::Test),
            _ => None,
        }
    }

    /// Whether actuator state machines are scanned in this mode.
    #[inline]
    pub const fn is_enabled(self) -> bool {
        !matches!(self, Self::Disabled)
    }

    /// Whether entering this mode starts a fresh match segment
    /// (cylinders re-initialized, match clock restarted).
    #[inline]
    pub const fn starts_segment(self) -> bool {
        matches!(self, Self::Autonomous | Self::Test)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Disabled => "Disabled",
            Self::Autonomous => "Autonomous",
            Self::Teleop => "Teleop",
            Self::Test => "Test",
        }
    }
}

// ─── Pressure Supervisor ────────────────────────────────────────────

/// Air-tank readiness machine.
///
/// `pressure_ready` is true only while in `Pressurized`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[repr(u8)]
pub enum PressureState {
    /// Clear the gate and counters, then wait for pressure.
    #[default]
    Initialize = 0,
    /// Tanks below threshold; waiting for a sustained rise.
    WaitPressurize = 1,
    /// Tanks at or above threshold; watching for a sustained drop.
    Pressurized = 2,
}

impl PressureState {
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Initialize),
            1 => Some(Self::WaitPressurize),
            2 => Some(Self::Pressurized),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Initialize => "Initialize",
            Self::WaitPressurize => "WaitPressurize",
            Self::Pressurized => "Pressurized",
        }
    }
}

// ─── Cylinder Controller ────────────────────────────────────────────

/// Two-arm extend/retract cylinder machine.
///
/// Only one state is active at a time; the commanded position is a pure
/// function of the state (see [`CylinderState::commanded_position`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[repr(u8)]
pub enum CylinderState {
    /// Parked before the first initialize; inert.
    #[default]
    Idle = 0,
    /// Retracted, waiting for the extend command.
    AwaitExtendCmd = 1,
    /// Extend commanded, dwell running.
    Extending = 2,
    /// Extended, waiting for the button to be released.
    AwaitExtendRelease = 3,
    /// Extended, waiting for the retract command.
    AwaitRetractCmd = 4,
    /// Retract commanded, dwell running.
    Retracting = 5,
    /// Retracted, waiting for the button to be released.
    AwaitRetractRelease = 6,
}

impl CylinderState {
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Idle),
            1 => Some(Self::AwaitExtendCmd),
            2 => Some(Self::Extending),
            3 => Some(Self::AwaitExtendRelease),
            4 => Some(Self::AwaitRetractCmd),
            5 => Some(Self::Retracting),
            6 => Some(Self::AwaitRetractRelease),
            _ => None,
        }
    }

    /// Position the solenoid is driven to while in this state.
    pub const fn commanded_position(self) -> CylinderPosition {
        match self {
            Self::Extending | Self::AwaitExtendRelease | Self::AwaitRetractCmd => {
                CylinderPosition::Extended
            }
            Self::Idle
            | Self::AwaitExtendCmd
            | Self::Retracting
            | Self::AwaitRetractRelease => CylinderPosition::Retracted,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::AwaitExtendCmd => "AwaitExtendCmd",
            Self::Extending => "Extending",
            Self::AwaitExtendRelease => "AwaitExtendRelease",
            Self::AwaitRetractCmd => "AwaitRetractCmd",
            Self::Retracting => "Retracting",
            Self::AwaitRetractRelease => "AwaitRetractRelease",
        }
    }

    /// Short operator-facing label for the dashboard.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::AwaitExtendCmd | Self::AwaitRetractRelease => "Retracted",
            Self::Extending => "Extending",
            Self::AwaitExtendRelease | Self::AwaitRetractCmd => "Extended",
            Self::Retracting => "Retracting",
        }
    }
}

/// Two-position actuator command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[repr(u8)]
pub enum CylinderPosition {
    #[default]
    Retracted = 0,
    Extended = 1,
}

impl CylinderPosition {
    /// Single-solenoid channel level.
    #[inline]
    pub const fn solenoid_on(self) -> bool {
        matches!(self, Self::Extended)
    }
}

// ─── Match Clock Supervisor ─────────────────────────────────────────

/// "Time to climb" countdown machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[repr(u8)]
pub enum ClockState {
    /// Idle; stopwatch not polled.
    #[default]
    WaitActivation = 0,
    /// Start requested; next tick restarts the stopwatch.
    Initialize = 1,
    /// Counting toward the climb threshold.
    WaitElapsed = 2,
}

impl ClockState {
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::WaitActivation),
            1 => Some(Self::Initialize),
            2 => Some(Self::WaitElapsed),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::WaitActivation => "WaitActivation",
            Self::Initialize => "Initialize",
            Self::WaitElapsed => "WaitElapsed",
        }
    }
}
