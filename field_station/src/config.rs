//! Station configuration.
//!
//! Loaded from a single TOML file via `field_common::config::ConfigLoader`.
//!
//! ```toml
//! [shared]
//! log_level = "info"
//! station_name = "practice-field-01"
//!
//! [cycle]
//! cycle_time_us = 20000
//!
//! [field]
//! opponent_count = 3
//! piece_count = 8
//! airborne_piece_count = 1
//!
//! [telemetry]
//! jsonl_path = "logs/field.jsonl"
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use field_common::config::{ConfigError, SharedConfig};
use field_common::consts::{CYCLE_TIME_US, MAX_OBJECTS_PER_TYPE};

/// Complete station configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationConfig {
    pub shared: SharedConfig,
    #[serde(default)]
    pub cycle: CycleConfig,
    #[serde(default)]
    pub field: FieldConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl StationConfig {
    /// Validate the full configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` on the first violated
    /// bound.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;

        if self.cycle.cycle_time_us == 0 {
            return Err(ConfigError::ValidationError(
                "cycle_time_us must be positive".to_string(),
            ));
        }
        if self.cycle.stats_interval == 0 {
            return Err(ConfigError::ValidationError(
                "stats_interval must be positive".to_string(),
            ));
        }
        if self.field.opponent_count > MAX_OBJECTS_PER_TYPE {
            return Err(ConfigError::ValidationError(format!(
                "opponent_count {} exceeds limit {}",
                self.field.opponent_count, MAX_OBJECTS_PER_TYPE
            )));
        }
        let pieces = self.field.piece_count + self.field.airborne_piece_count;
        if pieces > MAX_OBJECTS_PER_TYPE {
            return Err(ConfigError::ValidationError(format!(
                "{pieces} game pieces exceed limit {MAX_OBJECTS_PER_TYPE}"
            )));
        }
        Ok(())
    }
}

/// Cycle pacing parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleConfig {
    /// Control cycle period [µs].
    #[serde(default = "default_cycle_time_us")]
    pub cycle_time_us: u64,

    /// Stop after this many cycles; absent = run until interrupted.
    #[serde(default)]
    pub max_cycles: Option<u64>,

    /// Emit a cycle statistics report every N cycles.
    #[serde(default = "default_stats_interval")]
    pub stats_interval: u64,
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            cycle_time_us: default_cycle_time_us(),
            max_cycles: None,
            stats_interval: default_stats_interval(),
        }
    }
}

fn default_cycle_time_us() -> u64 {
    CYCLE_TIME_US
}

fn default_stats_interval() -> u64 {
    250
}

/// Simulated field population.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldConfig {
    /// Number of simulated opponent robots.
    #[serde(default = "default_opponent_count")]
    pub opponent_count: usize,

    /// Number of stationary game pieces.
    #[serde(default = "default_piece_count")]
    pub piece_count: usize,

    /// Number of airborne game pieces.
    #[serde(default = "default_airborne_count")]
    pub airborne_piece_count: usize,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            opponent_count: default_opponent_count(),
            piece_count: default_piece_count(),
            airborne_piece_count: default_airborne_count(),
        }
    }
}

fn default_opponent_count() -> usize {
    3
}

fn default_piece_count() -> usize {
    8
}

fn default_airborne_count() -> usize {
    1
}

/// Structured-log output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// JSON-lines output file for the structured log.
    #[serde(default = "default_jsonl_path")]
    pub jsonl_path: PathBuf,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            jsonl_path: default_jsonl_path(),
        }
    }
}

fn default_jsonl_path() -> PathBuf {
    PathBuf::from("logs/field.jsonl")
}
