//! Simulation configuration
//!
//! Every section has a default, so a config file only needs the values it
//! changes. Loading always validates.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tickboard_agent::{ExecutionConfig, RoutineTable, SeekerConfig};
use tickboard_time::ClockConfig;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Result type for configuration
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Clock section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockSection {
    pub ticks_per_second: f64,
    pub max_ticks_per_update: u32,
    /// Initial speed multiplier
    pub speed: f64,
}

impl Default for ClockSection {
    fn default() -> Self {
        let clock = ClockConfig::default();
        ClockSection {
            ticks_per_second: clock.ticks_per_second,
            max_ticks_per_update: clock.max_ticks_per_update,
            speed: 1.0,
        }
    }
}

impl ClockSection {
    pub fn clock_config(&self) -> ClockConfig {
        ClockConfig {
            ticks_per_second: self.ticks_per_second,
            max_ticks_per_update: self.max_ticks_per_update,
        }
    }
}

/// Board section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardSection {
    /// Silence allowed on a held ticket before it is reclaimed
    pub stale_timeout_ticks: u64,
}

impl Default for BoardSection {
    fn default() -> Self {
        BoardSection {
            stale_timeout_ticks: 200,
        }
    }
}

/// Full simulation configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub clock: ClockSection,
    pub board: BoardSection,
    pub seeker: SeekerConfig,
    pub execution: ExecutionConfig,
    pub routines: RoutineTable,
}

impl SimulationConfig {
    /// Parse and validate a JSON document
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: SimulationConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file
    pub fn from_path(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn to_json_pretty(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check value ranges
    pub fn validate(&self) -> ConfigResult<()> {
        let clock = &self.clock;
        if !(clock.ticks_per_second.is_finite() && clock.ticks_per_second > 0.0) {
            return invalid("clock.ticks_per_second must be positive");
        }
        if clock.max_ticks_per_update == 0 {
            return invalid("clock.max_ticks_per_update must be at least 1");
        }
        if !(clock.speed.is_finite() && clock.speed >= 0.0) {
            return invalid("clock.speed must be non-negative");
        }
        if self.board.stale_timeout_ticks == 0 {
            return invalid("board.stale_timeout_ticks must be at least 1");
        }

        let seeker = &self.seeker;
        if !(seeker.read_radius.is_finite() && seeker.read_radius >= 0.0) {
            return invalid("seeker.read_radius must be non-negative");
        }
        if seeker.passive_read_interval == 0 || seeker.replan_interval == 0 {
            return invalid("seeker intervals must be at least 1");
        }
        if seeker.linger_ticks == 0 {
            return invalid("seeker.linger_ticks must be at least 1");
        }
        if self.execution.max_stall_ticks == 0 {
            return invalid("execution.max_stall_ticks must be at least 1");
        }
        Ok(())
    }
}

fn invalid(msg: &str) -> ConfigResult<()> {
    Err(ConfigError::Invalid(msg.to_string()))
}
