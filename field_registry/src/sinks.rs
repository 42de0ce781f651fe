//! Telemetry sink interfaces.
//!
//! The registry pushes to two observer surfaces: a dashboard overlay
//! (planar, human-facing) and a structured-log sink (spatial, full
//! fidelity, for offline replay). Both are injected at registry
//! construction — no process-wide telemetry globals — so tests can
//! substitute the capturing fakes in [`capture`].
//!
//! Sinks are best-effort: implementations must not block the publish
//! cycle and must not fail it. A sink that hits an I/O problem reports
//! it out-of-band (counter + log line) and keeps going.

pub mod capture;
pub mod jsonl;
pub mod trace;

use field_common::geometry::{Pose2d, Pose3d};
use thiserror::Error;

/// Sink construction error.
#[derive(Debug, Error)]
pub enum SinkError {
    /// Output file could not be opened.
    #[error("failed to open telemetry output '{path}': {source}")]
    Open {
        path: String,
        source: std::io::Error,
    },
}

/// Human-facing 2D field diagram.
///
/// Channel names are exactly the registry's type names; re-setting a
/// channel replaces its prior contents. The robot has its own reserved
/// overlay, separate from any channel.
pub trait DashboardSink {
    /// Replace the overlay for `channel` with `poses`. An empty slice is
    /// a valid update and clears the channel's previous rendering.
    fn set_poses(&mut self, channel: &str, poses: &[Pose2d]);

    /// Update the reserved robot overlay.
    fn set_robot_pose(&mut self, pose: Pose2d);
}

/// Full-fidelity structured log.
///
/// Paths follow `"/Field/" + type_name` for per-type pose arrays and the
/// reserved `"/Field/Robot"` for the robot's flattened pose.
pub trait TelemetrySink {
    /// Record the full spatial pose array for one channel path.
    fn record_poses(&mut self, path: &str, poses: &[Pose3d]);

    /// Record a single planar pose under a channel path.
    fn record_pose(&mut self, path: &str, pose: Pose2d);
}
