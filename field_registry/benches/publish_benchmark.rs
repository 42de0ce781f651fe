//! Publish benchmark — measure the per-cycle projection across field
//! populations.
//!
//! The publish path must fit comfortably inside the 20 ms control cycle
//! alongside everything else the robot program does; this sweeps realistic
//! object counts (a handful of opponents, a season's worth of game pieces)
//! and a worst-case population.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::sync::Arc;

use field_common::geometry::{Pose2d, Pose3d, Rotation3d};
use field_common::object::{FieldObject, ObjectHandle, PlanarFieldObject};
use field_registry::FieldRegistry;
use field_registry::sinks::capture::{CaptureDashboard, CaptureTelemetry};

struct Grounded {
    type_name: &'static str,
    pose: Pose2d,
}

impl PlanarFieldObject for Grounded {
    fn type_name(&self) -> &str {
        self.type_name
    }

    fn pose2d(&self) -> Pose2d {
        self.pose
    }
}

struct Airborne {
    type_name: &'static str,
    pose: Pose3d,
}

impl FieldObject for Airborne {
    fn type_name(&self) -> &str {
        self.type_name
    }

    fn pose3d(&self) -> Pose3d {
        self.pose
    }
}

/// Populate a registry with `n` objects split across three type groups.
/// Returns the owning handles; they must outlive the benchmark loop.
fn populate(
    registry: &mut FieldRegistry<CaptureDashboard, CaptureTelemetry>,
    n: usize,
) -> Vec<ObjectHandle> {
    let mut handles = Vec::with_capacity(n);
    for i in 0..n {
        let x = (i % 16) as f64;
        let y = (i / 16) as f64;
        let handle: ObjectHandle = match i % 3 {
            0 => Arc::new(Grounded {
                type_name: "GamePiece",
                pose: Pose2d::new(x, y, 0.0),
            }),
            1 => Arc::new(Grounded {
                type_name: "Opponent",
                pose: Pose2d::new(x, y, 1.0),
            }),
            _ => Arc::new(Airborne {
                type_name: "GamePiece",
                pose: Pose3d::new(x, y, 1.5, Rotation3d::new(0.0, 0.4, 0.0)),
            }),
        };
        registry.add_object(&handle);
        handles.push(handle);
    }
    handles
}

fn bench_publish(c: &mut Criterion) {
    let mut group = c.benchmark_group("publish");

    for &count in &[4usize, 16, 64] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            let robot: ObjectHandle = Arc::new(Grounded {
                type_name: "Robot",
                pose: Pose2d::new(8.0, 4.0, 0.3),
            });
            let mut registry =
                FieldRegistry::new(robot, CaptureDashboard::new(), CaptureTelemetry::new());
            let _handles = populate(&mut registry, count);

            b.iter(|| {
                registry.publish();
                black_box(registry.telemetry().pose_records("/Field/Robot"));
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_publish);
criterion_main!(benches);
