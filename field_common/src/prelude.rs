//! Prelude module for common re-exports.
//!
//! Consumers can do `use field_common::prelude::*;` and get the most
//! important types without listing individual paths.

// ─── Geometry ───────────────────────────────────────────────────────
pub use crate::geometry::{Pose2d, Pose3d, Rotation3d, normalize_angle};

// ─── Tracked objects ────────────────────────────────────────────────
pub use crate::object::{FieldObject, ObjectHandle, PlanarFieldObject};

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{ConfigError, ConfigLoader, LogLevel, SharedConfig};

// ─── System Constants ───────────────────────────────────────────────
pub use crate::consts::{CYCLE_TIME_US, FIELD_LOG_PREFIX, ROBOT_LOG_PATH};
