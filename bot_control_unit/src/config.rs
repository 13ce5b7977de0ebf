//! TOML configuration loader with validation.
//!
//! Loads a [`ControlUnitConfig`] and runs every bounds check before the cycle
//! is built. A missing file is an error; an empty file yields the competition
//! defaults.

use std::path::{Path, PathBuf};

use bot_common::config::{ConfigError, ConfigLoader};
use bot_common::control_unit::config::ControlUnitConfig;
use thiserror::Error;
use tracing::info;

// ─── Error Type ─────────────────────────────────────────────────────

/// Configuration loading/validation error.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Reading, parsing or validating a specific file failed.
    #[error("config {}: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: ConfigError,
    },

    /// In-memory document rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl LoadError {
    /// Underlying config error, regardless of origin.
    pub fn config_error(&self) -> &ConfigError {
        match self {
            Self::File { source, .. } => source,
            Self::Config(e) => e,
        }
    }
}

// ─── Loading Functions ──────────────────────────────────────────────

/// Load and validate the control-unit configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ControlUnitConfig, LoadError> {
    let config = ControlUnitConfig::load(path)
        .and_then(validated)
        .map_err(|source| LoadError::File {
            path: path.to_path_buf(),
            source,
        })?;
    info!(path = %path.display(), "configuration loaded");
    Ok(config)
}

/// Load config from a TOML string (for testing and embedded defaults).
pub fn load_config_from_str(content: &str) -> Result<ControlUnitConfig, LoadError> {
    let config = ControlUnitConfig::parse(content).and_then(validated)?;
    Ok(config)
}

fn validated(config: ControlUnitConfig) -> Result<ControlUnitConfig, ConfigError> {
    config.validate().map_err(ConfigError::ValidationError)?;
    Ok(config)
}

/// Log the effective configuration at `info`.
pub fn log_summary(config: &ControlUnitConfig) {
    info!(
        robot = %config.shared.service_name,
        cycle_time_ms = config.cycle_time_ms,
        debounce_window_ticks = config.debounce_window_ticks,
        threshold_volts = config.pressure.threshold_volts,
        climb_after_s = config.match_clock.climb_after_s,
        "control unit config"
    );
    for (name, cylinder) in config.cylinders.entries() {
        info!(
            cylinder = name,
            button = cylinder.button,
            channel = cylinder.channel,
            dwell_s = cylinder.dwell_s.unwrap_or(0.0),
            gated = cylinder.gated_on_pressure,
            debounced = cylinder.debounced,
            "cylinder"
        );
    }
}
