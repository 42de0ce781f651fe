//! Capturing sink fakes for tests and benches.
//!
//! Both fakes record the latest value pushed per channel plus update
//! counters, so tests can assert on what a publish cycle emitted without
//! a live telemetry backend.

use std::collections::HashMap;

use field_common::geometry::{Pose2d, Pose3d};

use super::{DashboardSink, TelemetrySink};

/// Dashboard fake recording the latest overlay per channel.
#[derive(Debug, Default)]
pub struct CaptureDashboard {
    channels: HashMap<String, Vec<Pose2d>>,
    robot_pose: Option<Pose2d>,
    robot_updates: u64,
}

impl CaptureDashboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest overlay contents for `channel`, if it was ever set.
    pub fn poses(&self, channel: &str) -> Option<&[Pose2d]> {
        self.channels.get(channel).map(Vec::as_slice)
    }

    /// Latest robot overlay pose.
    pub fn robot_pose(&self) -> Option<Pose2d> {
        self.robot_pose
    }

    /// Number of robot overlay updates received.
    pub fn robot_updates(&self) -> u64 {
        self.robot_updates
    }

    /// Names of all channels that were ever set.
    pub fn channel_names(&self) -> Vec<&str> {
        self.channels.keys().map(String::as_str).collect()
    }
}

impl DashboardSink for CaptureDashboard {
    fn set_poses(&mut self, channel: &str, poses: &[Pose2d]) {
        self.channels.insert(channel.to_owned(), poses.to_vec());
    }

    fn set_robot_pose(&mut self, pose: Pose2d) {
        self.robot_pose = Some(pose);
        self.robot_updates += 1;
    }
}

/// Structured-log fake recording the latest record per path.
#[derive(Debug, Default)]
pub struct CaptureTelemetry {
    pose_arrays: HashMap<String, Vec<Pose3d>>,
    array_counts: HashMap<String, u64>,
    latest_poses: HashMap<String, Pose2d>,
    pose_counts: HashMap<String, u64>,
}

impl CaptureTelemetry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest pose array recorded under `path`.
    pub fn pose_array(&self, path: &str) -> Option<&[Pose3d]> {
        self.pose_arrays.get(path).map(Vec::as_slice)
    }

    /// Number of pose-array records received under `path`.
    pub fn array_records(&self, path: &str) -> u64 {
        self.array_counts.get(path).copied().unwrap_or(0)
    }

    /// Latest single pose recorded under `path`.
    pub fn latest_pose(&self, path: &str) -> Option<Pose2d> {
        self.latest_poses.get(path).copied()
    }

    /// Number of single-pose records received under `path`.
    pub fn pose_records(&self, path: &str) -> u64 {
        self.pose_counts.get(path).copied().unwrap_or(0)
    }
}

impl TelemetrySink for CaptureTelemetry {
    fn record_poses(&mut self, path: &str, poses: &[Pose3d]) {
        self.pose_arrays.insert(path.to_owned(), poses.to_vec());
        *self.array_counts.entry(path.to_owned()).or_insert(0) += 1;
    }

    fn record_pose(&mut self, path: &str, pose: Pose2d) {
        self.latest_poses.insert(path.to_owned(), pose);
        *self.pose_counts.entry(path.to_owned()).or_insert(0) += 1;
    }
}
