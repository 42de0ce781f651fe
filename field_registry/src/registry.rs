//! Field object registry.
//!
//! Stores and projects a competition field: the primary robot, opponent
//! robots and game pieces, grouped by type name. The registry holds weak,
//! non-owning handles — producers (vision during a real match, the field
//! simulation otherwise) own object lifetimes and register/deregister as
//! objects enter and leave play.
//!
//! Grouping is by the string type name rather than a closed enum, so new
//! object categories (a new season's game pieces) need no registry
//! changes. Membership is by object identity, not pose value: two objects
//! at the same pose are distinct entries, and re-adding a handle is a
//! no-op.

use std::borrow::Borrow;
use std::collections::{HashMap, HashSet};
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Weak};

use field_common::consts::{FIELD_LOG_PREFIX, ROBOT_LOG_PATH};
use field_common::geometry::{Pose2d, Pose3d};
use field_common::object::{FieldObject, ObjectHandle};

use crate::sinks::{DashboardSink, TelemetrySink};

// ─── Identity-Keyed Entries ─────────────────────────────────────────

/// Address of the producer's allocation, used as the identity key.
///
/// The weak reference held alongside it keeps the allocation alive, so
/// the address cannot be reused while the entry exists.
fn identity_key(object: &ObjectHandle) -> usize {
    Arc::as_ptr(object).cast::<()>() as usize
}

/// Non-owning set entry: weak handle plus its identity key.
struct ObjectEntry {
    handle: Weak<dyn FieldObject>,
    key: usize,
}

impl ObjectEntry {
    fn new(object: &ObjectHandle) -> Self {
        Self {
            handle: Arc::downgrade(object),
            key: identity_key(object),
        }
    }
}

impl PartialEq for ObjectEntry {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for ObjectEntry {}

impl Hash for ObjectEntry {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl Borrow<usize> for ObjectEntry {
    fn borrow(&self) -> &usize {
        &self.key
    }
}

// ─── Type Groups ────────────────────────────────────────────────────

/// Per-type set of tracked objects plus its precomputed log path.
struct TypeGroup {
    objects: HashSet<ObjectEntry>,
    log_path: String,
}

impl TypeGroup {
    fn new(type_name: &str) -> Self {
        Self {
            objects: HashSet::new(),
            log_path: format!("{FIELD_LOG_PREFIX}{type_name}"),
        }
    }
}

// ─── Registry ───────────────────────────────────────────────────────

/// The authoritative in-process view of what is on the field right now.
///
/// Constructed once per robot program with the primary robot's pose
/// provider and the two observer sinks; lives for the whole program.
/// All mutation and publishing happen on the single control thread — the
/// registry carries no internal locking.
pub struct FieldRegistry<D, T> {
    objects_by_type: HashMap<String, TypeGroup>,
    robot: ObjectHandle,
    dashboard: D,
    telemetry: T,
    // Publish scratch buffers, reused every cycle.
    poses2d: Vec<Pose2d>,
    poses3d: Vec<Pose3d>,
}

impl<D: DashboardSink, T: TelemetrySink> FieldRegistry<D, T> {
    /// Create a registry tracking `robot` through the reserved robot
    /// channel, publishing to the injected sinks.
    pub fn new(robot: ObjectHandle, dashboard: D, telemetry: T) -> Self {
        Self {
            objects_by_type: HashMap::new(),
            robot,
            dashboard,
            telemetry,
            poses2d: Vec::new(),
            poses3d: Vec::new(),
        }
    }

    /// Register a tracked object under its reported type name, creating
    /// the type group if absent. Re-adding the same handle is a no-op.
    /// Returns a clone of the handle for chaining.
    ///
    /// Objects stay filed under the type name they report here; a later
    /// `type_name()` change does not re-key them (and makes them
    /// invisible to [`remove_object`](Self::remove_object), which
    /// resolves the current name).
    ///
    /// # Panics
    ///
    /// Panics if the object reports an empty type name.
    pub fn add_object(&mut self, object: &ObjectHandle) -> ObjectHandle {
        let type_name = object.type_name();
        assert!(
            !type_name.is_empty(),
            "tracked object reported an empty type name"
        );
        debug_assert!(
            !Arc::ptr_eq(object, &self.robot),
            "the primary robot is tracked through its own reserved channel"
        );

        self.objects_by_type
            .entry(type_name.to_owned())
            .or_insert_with(|| TypeGroup::new(type_name))
            .objects
            .insert(ObjectEntry::new(object));
        Arc::clone(object)
    }

    /// Deregister an object. Returns the handle when it was tracked under
    /// its current type name, `None` otherwise — removal of an absent
    /// object is a normal outcome, not an error.
    pub fn remove_object(&mut self, object: &ObjectHandle) -> Option<ObjectHandle> {
        let group = self.objects_by_type.get_mut(object.type_name())?;
        group
            .objects
            .take(&identity_key(object))
            .map(|_| Arc::clone(object))
    }

    /// Atomically replace the set for `type_name` with a fresh empty one
    /// and return the still-live previous members — a stable snapshot for
    /// drain-and-repopulate patterns (e.g. resetting game pieces between
    /// autonomous attempts).
    ///
    /// Clearing an unknown type returns an empty vector and establishes
    /// an (empty) entry for that type.
    pub fn clear_type(&mut self, type_name: &str) -> Vec<ObjectHandle> {
        let group = self
            .objects_by_type
            .entry(type_name.to_owned())
            .or_insert_with(|| TypeGroup::new(type_name));
        let previous = std::mem::take(&mut group.objects);
        previous
            .into_iter()
            .filter_map(|entry| entry.handle.upgrade())
            .collect()
    }

    /// Project the field to both sinks. Called once per control cycle.
    ///
    /// For every type group, in no guaranteed order: planar objects form
    /// the dashboard overlay sequence (non-planar objects are silently
    /// excluded), while every object contributes its spatial pose to the
    /// structured log. Entries whose producer dropped the object are
    /// pruned here and contribute nothing.
    ///
    /// The robot is always published, to the reserved dashboard overlay
    /// and the reserved `"/Field/Robot"` log channel, even when no other
    /// objects are registered.
    pub fn publish(&mut self) {
        let Self {
            objects_by_type,
            robot,
            dashboard,
            telemetry,
            poses2d,
            poses3d,
        } = self;

        for (type_name, group) in objects_by_type.iter_mut() {
            poses2d.clear();
            poses3d.clear();

            group.objects.retain(|entry| match entry.handle.upgrade() {
                Some(object) => {
                    poses3d.push(object.pose3d());
                    if object.on_2d_field() {
                        poses2d.push(object.pose2d());
                    }
                    true
                }
                None => false,
            });

            dashboard.set_poses(type_name, poses2d);
            telemetry.record_poses(&group.log_path, poses3d);
        }

        let robot_pose = robot.pose2d();
        dashboard.set_robot_pose(robot_pose);
        telemetry.record_pose(ROBOT_LOG_PATH, robot_pose);
    }

    // ─── Diagnostics ────────────────────────────────────────────────

    /// The primary robot handle.
    pub fn robot(&self) -> &ObjectHandle {
        &self.robot
    }

    /// Number of type groups (including empty ones).
    pub fn type_count(&self) -> usize {
        self.objects_by_type.len()
    }

    /// Number of registered handles under `type_name`. Handles whose
    /// producer dropped the object are counted until the next publish
    /// prunes them.
    pub fn object_count(&self, type_name: &str) -> usize {
        self.objects_by_type
            .get(type_name)
            .map_or(0, |group| group.objects.len())
    }

    /// The injected dashboard sink.
    pub fn dashboard(&self) -> &D {
        &self.dashboard
    }

    /// The injected telemetry sink.
    pub fn telemetry(&self) -> &T {
        &self.telemetry
    }

    /// Mutable access to the telemetry sink (e.g. for a shutdown flush).
    pub fn telemetry_mut(&mut self) -> &mut T {
        &mut self.telemetry
    }
}
