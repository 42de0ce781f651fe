//! Headless dashboard reporting through `tracing`.
//!
//! Stations without an attached operator display still want overlay
//! activity visible in the log stream. `TraceDashboard` emits one debug
//! event per channel update instead of rendering.

use tracing::debug;

use field_common::geometry::Pose2d;

use super::DashboardSink;

/// Dashboard sink that logs overlay updates at DEBUG level.
#[derive(Debug, Default)]
pub struct TraceDashboard;

impl TraceDashboard {
    pub fn new() -> Self {
        Self
    }
}

impl DashboardSink for TraceDashboard {
    fn set_poses(&mut self, channel: &str, poses: &[Pose2d]) {
        debug!(channel, count = poses.len(), "field overlay updated");
    }

    fn set_robot_pose(&mut self, pose: Pose2d) {
        debug!(x = pose.x, y = pose.y, theta = pose.theta, "robot overlay updated");
    }
}
