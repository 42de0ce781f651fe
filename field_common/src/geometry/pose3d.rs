//! Spatial pose and orientation.

use serde::{Deserialize, Serialize};

use super::{Pose2d, normalize_angle};

/// Intrinsic roll/pitch/yaw orientation, each angle normalized to [-π, π].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rotation3d {
    /// Rotation around the x axis in radians
    pub roll: f64,
    /// Rotation around the y axis in radians
    pub pitch: f64,
    /// Rotation around the z axis in radians
    pub yaw: f64,
}

impl Rotation3d {
    /// Create a new rotation with all angles normalized to [-π, π].
    #[inline]
    pub fn new(roll: f64, pitch: f64, yaw: f64) -> Self {
        Self {
            roll: normalize_angle(roll),
            pitch: normalize_angle(pitch),
            yaw: normalize_angle(yaw),
        }
    }

    /// Identity rotation.
    #[inline]
    pub const fn identity() -> Self {
        Self {
            roll: 0.0,
            pitch: 0.0,
            yaw: 0.0,
        }
    }

    /// True when the rotation has no out-of-plane component.
    #[inline]
    pub fn is_planar(&self) -> bool {
        self.roll == 0.0 && self.pitch == 0.0
    }
}

impl Default for Rotation3d {
    fn default() -> Self {
        Self::identity()
    }
}

/// Full spatial pose: position in meters plus [`Rotation3d`] orientation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose3d {
    /// X position in meters
    pub x: f64,
    /// Y position in meters
    pub y: f64,
    /// Elevation above the field plane in meters
    pub z: f64,
    /// Orientation
    pub rotation: Rotation3d,
}

impl Pose3d {
    /// Create a new spatial pose.
    #[inline]
    pub fn new(x: f64, y: f64, z: f64, rotation: Rotation3d) -> Self {
        Self { x, y, z, rotation }
    }

    /// Identity pose at the field origin.
    #[inline]
    pub const fn identity() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            rotation: Rotation3d::identity(),
        }
    }

    /// Embed a planar pose at zero elevation with identity out-of-plane
    /// rotation. Inverse of [`Pose3d::to_pose2d`] for planar poses.
    #[inline]
    pub fn from_pose2d(pose: Pose2d) -> Self {
        Self {
            x: pose.x,
            y: pose.y,
            z: 0.0,
            rotation: Rotation3d::new(0.0, 0.0, pose.theta),
        }
    }

    /// Project onto the field plane: drop elevation, roll and pitch.
    #[inline]
    pub fn to_pose2d(&self) -> Pose2d {
        Pose2d::new(self.x, self.y, self.rotation.yaw)
    }
}

impl Default for Pose3d {
    fn default() -> Self {
        Self::identity()
    }
}

impl From<Pose2d> for Pose3d {
    fn from(pose: Pose2d) -> Self {
        Self::from_pose2d(pose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

    #[test]
    fn embed_then_flatten_round_trips() {
        let p = Pose2d::new(1.0, 2.0, FRAC_PI_4);
        let embedded = Pose3d::from_pose2d(p);

        assert_eq!(embedded.z, 0.0);
        assert!(embedded.rotation.is_planar());
        assert_eq!(embedded.to_pose2d(), p);
    }

    #[test]
    fn flatten_drops_out_of_plane_components() {
        let pose = Pose3d::new(3.0, 4.0, 1.5, Rotation3d::new(0.2, -0.3, FRAC_PI_2));
        let flat = pose.to_pose2d();

        assert_relative_eq!(flat.x, 3.0);
        assert_relative_eq!(flat.y, 4.0);
        assert_relative_eq!(flat.theta, FRAC_PI_2);
    }

    #[test]
    fn rotation_normalizes_each_axis() {
        let r = Rotation3d::new(3.0 * FRAC_PI_2, -3.0 * FRAC_PI_2, 0.0);
        assert_relative_eq!(r.roll, -FRAC_PI_2, epsilon = 1e-12);
        assert_relative_eq!(r.pitch, FRAC_PI_2, epsilon = 1e-12);
        assert!(!r.is_planar());
    }

    #[test]
    fn from_impl_matches_embed() {
        let p = Pose2d::new(-1.0, 0.5, 0.1);
        assert_eq!(Pose3d::from(p), Pose3d::from_pose2d(p));
    }
}
