//! System-wide constants for the field telemetry workspace.
//!
//! Single source of truth for cycle timing, telemetry channel paths and
//! registry bounds. Imported by all crates — no duplication permitted.

/// Default control cycle time in microseconds (50 Hz = 20 000 µs).
pub const CYCLE_TIME_US: u64 = 20_000;

/// Prefix for per-type structured-log channels (`"/Field/" + type name`).
pub const FIELD_LOG_PREFIX: &str = "/Field/";

/// Reserved structured-log channel for the primary robot pose.
pub const ROBOT_LOG_PATH: &str = "/Field/Robot";

/// Upper bound on simultaneously tracked objects of one type, used for
/// configuration validation and bench sizing. The registry itself grows
/// dynamically; producers registering more than this are misconfigured.
pub const MAX_OBJECTS_PER_TYPE: usize = 64;

/// Competition field length [m], x axis.
pub const FIELD_LENGTH_M: f64 = 16.54;

/// Competition field width [m], y axis.
pub const FIELD_WIDTH_M: f64 = 8.21;

/// Default station configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "config/station.toml";
