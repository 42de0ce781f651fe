//! Registry behavior tests.
//!
//! Exercises the registry's observable contract end to end with the
//! capturing sinks: set semantics, removal outcomes, clear-and-snapshot,
//! the 2D/3D publish partition, the reserved robot channel, render
//! clearing and dead-handle pruning.

use std::sync::{Arc, RwLock};

use field_common::consts::ROBOT_LOG_PATH;
use field_common::geometry::{Pose2d, Pose3d, Rotation3d};
use field_common::object::{FieldObject, ObjectHandle, PlanarFieldObject};
use field_registry::FieldRegistry;
use field_registry::sinks::capture::{CaptureDashboard, CaptureTelemetry};

// ─── Test Objects ───────────────────────────────────────────────────

/// Planar object with a fixed pose.
struct Piece {
    type_name: &'static str,
    pose: Pose2d,
}

impl PlanarFieldObject for Piece {
    fn type_name(&self) -> &str {
        self.type_name
    }

    fn pose2d(&self) -> Pose2d {
        self.pose
    }
}

/// Airborne object with a fixed spatial pose; not on the 2D field.
struct FlyingPiece {
    type_name: &'static str,
    pose: Pose3d,
}

impl FieldObject for FlyingPiece {
    fn type_name(&self) -> &str {
        self.type_name
    }

    fn pose3d(&self) -> Pose3d {
        self.pose
    }
}

/// Object whose reported type name can change after registration.
struct Drifter {
    type_name: RwLock<&'static str>,
    pose: Pose2d,
}

impl PlanarFieldObject for Drifter {
    fn type_name(&self) -> &str {
        *self.type_name.read().unwrap()
    }

    fn pose2d(&self) -> Pose2d {
        self.pose
    }
}

// ─── Helpers ────────────────────────────────────────────────────────

fn piece(type_name: &'static str, x: f64, y: f64, theta: f64) -> ObjectHandle {
    Arc::new(Piece {
        type_name,
        pose: Pose2d::new(x, y, theta),
    })
}

fn flying(type_name: &'static str, x: f64, y: f64, z: f64) -> ObjectHandle {
    Arc::new(FlyingPiece {
        type_name,
        pose: Pose3d::new(x, y, z, Rotation3d::new(0.2, 0.1, 0.0)),
    })
}

fn registry_with_robot(
    x: f64,
    y: f64,
    theta: f64,
) -> FieldRegistry<CaptureDashboard, CaptureTelemetry> {
    let robot = piece("Robot", x, y, theta);
    FieldRegistry::new(robot, CaptureDashboard::new(), CaptureTelemetry::new())
}

// ─── Set Semantics ──────────────────────────────────────────────────

#[test]
fn insertion_is_idempotent() {
    let mut registry = registry_with_robot(0.0, 0.0, 0.0);
    let note = piece("Note", 1.0, 2.0, 0.0);

    registry.add_object(&note);
    registry.add_object(&note);

    assert_eq!(registry.object_count("Note"), 1);
}

#[test]
fn removal_returns_object_once() {
    let mut registry = registry_with_robot(0.0, 0.0, 0.0);
    let note = piece("Note", 1.0, 2.0, 0.0);

    registry.add_object(&note);
    let removed = registry.remove_object(&note).expect("object was tracked");
    assert!(Arc::ptr_eq(&removed, &note));
    assert_eq!(registry.object_count("Note"), 0);

    // Second removal signals not-found.
    assert!(registry.remove_object(&note).is_none());
}

#[test]
fn removal_of_never_added_object_is_not_found() {
    let mut registry = registry_with_robot(0.0, 0.0, 0.0);
    let stray = piece("Note", 3.0, 3.0, 0.0);
    assert!(registry.remove_object(&stray).is_none());

    // Same when the type group exists but the object is not a member.
    registry.add_object(&piece("Note", 0.0, 0.0, 0.0));
    assert!(registry.remove_object(&stray).is_none());
}

#[test]
fn clear_returns_snapshot_and_resets_type() {
    let mut registry = registry_with_robot(0.0, 0.0, 0.0);
    let a = registry.add_object(&piece("Note", 1.0, 0.0, 0.0));
    let b = registry.add_object(&piece("Note", 2.0, 0.0, 0.0));

    let snapshot = registry.clear_type("Note");
    assert_eq!(snapshot.len(), 2);
    assert!(snapshot.iter().any(|o| Arc::ptr_eq(o, &a)));
    assert!(snapshot.iter().any(|o| Arc::ptr_eq(o, &b)));

    // The type restarts empty; the snapshot is unaffected by new adds.
    let c = piece("Note", 3.0, 0.0, 0.0);
    registry.add_object(&c);
    assert_eq!(registry.object_count("Note"), 1);
    assert_eq!(snapshot.len(), 2);
    assert!(!snapshot.iter().any(|o| Arc::ptr_eq(o, &c)));
}

// ─── Publish Projection ─────────────────────────────────────────────

#[test]
fn publish_partitions_2d_overlay_from_3d_log() {
    let mut registry = registry_with_robot(0.0, 0.0, 0.0);
    let grounded = piece("Note", 1.0, 2.0, 0.0);
    let airborne = flying("Note", 5.0, 5.0, 1.3);
    registry.add_object(&grounded);
    registry.add_object(&airborne);

    registry.publish();

    // Dashboard: exactly the planar object.
    let overlay = registry.dashboard().poses("Note").expect("channel set");
    assert_eq!(overlay, &[Pose2d::new(1.0, 2.0, 0.0)]);

    // Log: both objects' full spatial poses.
    let logged = registry.telemetry().pose_array("/Field/Note").unwrap();
    assert_eq!(logged.len(), 2);
    assert!(logged.iter().any(|p| p.z == 0.0));
    assert!(logged.iter().any(|p| p.z == 1.3));
}

#[test]
fn robot_channel_is_always_published() {
    let mut registry = registry_with_robot(3.0, 4.0, 0.5);

    registry.publish();

    let dashboard = registry.dashboard();
    assert_eq!(dashboard.robot_updates(), 1);
    assert_eq!(dashboard.robot_pose(), Some(Pose2d::new(3.0, 4.0, 0.5)));
    assert!(dashboard.channel_names().is_empty());

    let telemetry = registry.telemetry();
    assert_eq!(telemetry.pose_records(ROBOT_LOG_PATH), 1);
    assert_eq!(
        telemetry.latest_pose(ROBOT_LOG_PATH),
        Some(Pose2d::new(3.0, 4.0, 0.5))
    );
}

#[test]
fn cleared_type_publishes_empty_overlay() {
    let mut registry = registry_with_robot(0.0, 0.0, 0.0);
    let a = registry.add_object(&piece("Piece", 1.0, 1.0, 0.0));

    registry.publish();
    assert_eq!(registry.dashboard().poses("Piece").unwrap().len(), 1);

    registry.clear_type("Piece");
    registry.publish();

    // The previous render is replaced, not retained.
    assert_eq!(registry.dashboard().poses("Piece"), Some(&[][..]));
    assert_eq!(
        registry.telemetry().pose_array("/Field/Piece").unwrap().len(),
        0
    );
    drop(a);
}

#[test]
fn dropped_producer_objects_are_pruned() {
    let mut registry = registry_with_robot(0.0, 0.0, 0.0);
    let transient = piece("Note", 1.0, 1.0, 0.0);
    registry.add_object(&transient);

    registry.publish();
    assert_eq!(registry.dashboard().poses("Note").unwrap().len(), 1);

    drop(transient);
    registry.publish();

    assert_eq!(registry.dashboard().poses("Note"), Some(&[][..]));
    assert_eq!(registry.object_count("Note"), 0);
}

#[test]
fn publish_updates_every_registered_type() {
    let mut registry = registry_with_robot(0.0, 0.0, 0.0);
    let note = registry.add_object(&piece("Note", 1.0, 0.0, 0.0));
    let opponent = registry.add_object(&piece("Opponent", 2.0, 0.0, 0.0));

    registry.publish();
    registry.publish();

    let telemetry = registry.telemetry();
    assert_eq!(telemetry.array_records("/Field/Note"), 2);
    assert_eq!(telemetry.array_records("/Field/Opponent"), 2);
    assert_eq!(telemetry.pose_records(ROBOT_LOG_PATH), 2);
    drop((note, opponent));
}

// ─── Type-Name Drift ────────────────────────────────────────────────

#[test]
fn drifted_object_stays_under_insertion_key() {
    let drifter = Arc::new(Drifter {
        type_name: RwLock::new("Cube"),
        pose: Pose2d::new(1.0, 1.0, 0.0),
    });
    let handle: ObjectHandle = drifter.clone();

    let mut registry = registry_with_robot(0.0, 0.0, 0.0);
    registry.add_object(&handle);

    // The object now reports a different type.
    *drifter.type_name.write().unwrap() = "Cone";

    // Removal resolves the current name and reports not-found.
    assert!(registry.remove_object(&handle).is_none());
    assert_eq!(registry.object_count("Cube"), 1);

    // Publish keeps rendering it under the insertion-time key.
    registry.publish();
    assert_eq!(registry.dashboard().poses("Cube").unwrap().len(), 1);
    assert!(registry.dashboard().poses("Cone").is_none());
}
