//! Tracked-object capability traits.
//!
//! This module defines the interface between pose producers (pose
//! estimator, opponent simulators, game-piece tracking) and the field
//! registry:
//!
//! - [`FieldObject`] - any object on the field with a spatial pose
//! - [`PlanarFieldObject`] - objects that live on the field plane; their
//!   spatial pose is derived from the planar one, never stored
//! - [`ObjectHandle`] - the shared, producer-owned handle the registry
//!   consumes
//!
//! Producers own the lifetime of their objects. The registry holds
//! non-owning references and queries poses on demand every publish cycle.

use std::sync::Arc;

use crate::geometry::{Pose2d, Pose3d};

/// Shared handle to a tracked object. Producers keep the owning `Arc`;
/// the registry stores only downgraded references.
pub type ObjectHandle = Arc<dyn FieldObject>;

/// An object on the field whose pose is rendered and logged.
///
/// Implement this directly for objects with a genuinely spatial pose
/// (e.g. a game piece in flight). Objects that live on the field plane
/// should implement [`PlanarFieldObject`] instead and receive this trait
/// through the blanket impl.
pub trait FieldObject: Send + Sync {
    /// Stable classification key. Objects with equal type names share one
    /// dashboard layer and one log channel. Must be non-empty.
    fn type_name(&self) -> &str;

    /// Current spatial pose, queried on demand at publish time.
    fn pose3d(&self) -> Pose3d;

    /// True when a planar projection of this object is semantically
    /// meaningful and the object should appear on the 2D dashboard.
    fn on_2d_field(&self) -> bool {
        false
    }

    /// Planar projection of the pose. Only meaningful when
    /// [`on_2d_field`](FieldObject::on_2d_field) is true.
    fn pose2d(&self) -> Pose2d {
        self.pose3d().to_pose2d()
    }
}

/// An object that lives on the field plane.
///
/// The spatial pose is derived by embedding the planar pose at zero
/// elevation with identity out-of-plane rotation, computed on read.
pub trait PlanarFieldObject: Send + Sync {
    /// Stable classification key. See [`FieldObject::type_name`].
    fn type_name(&self) -> &str;

    /// Current planar pose, queried on demand at publish time.
    fn pose2d(&self) -> Pose2d;
}

impl<T: PlanarFieldObject> FieldObject for T {
    fn type_name(&self) -> &str {
        PlanarFieldObject::type_name(self)
    }

    fn pose3d(&self) -> Pose3d {
        Pose3d::from_pose2d(PlanarFieldObject::pose2d(self))
    }

    fn on_2d_field(&self) -> bool {
        true
    }

    fn pose2d(&self) -> Pose2d {
        PlanarFieldObject::pose2d(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rotation3d;

    struct Marker {
        pose: Pose2d,
    }

    impl PlanarFieldObject for Marker {
        fn type_name(&self) -> &str {
            "Marker"
        }

        fn pose2d(&self) -> Pose2d {
            self.pose
        }
    }

    struct Drone {
        pose: Pose3d,
    }

    impl FieldObject for Drone {
        fn type_name(&self) -> &str {
            "Drone"
        }

        fn pose3d(&self) -> Pose3d {
            self.pose
        }
    }

    #[test]
    fn planar_object_derives_spatial_pose() {
        let marker = Marker {
            pose: Pose2d::new(1.0, 2.0, 0.5),
        };
        let object: &dyn FieldObject = &marker;

        assert!(object.on_2d_field());
        let spatial = object.pose3d();
        assert_eq!(spatial.z, 0.0);
        assert!(spatial.rotation.is_planar());
        assert_eq!(spatial.to_pose2d(), marker.pose);
        assert_eq!(object.pose2d(), marker.pose);
    }

    #[test]
    fn spatial_object_defaults_off_plane() {
        let drone = Drone {
            pose: Pose3d::new(2.0, 3.0, 1.2, Rotation3d::new(0.1, 0.0, 0.3)),
        };
        let object: &dyn FieldObject = &drone;

        assert!(!object.on_2d_field());
        // Provided pose2d flattens the spatial pose.
        assert_eq!(object.pose2d(), drone.pose.to_pose2d());
    }

    #[test]
    fn handles_coerce_to_dyn() {
        let handle: ObjectHandle = Arc::new(Marker {
            pose: Pose2d::identity(),
        });
        assert_eq!(handle.type_name(), "Marker");
    }
}
