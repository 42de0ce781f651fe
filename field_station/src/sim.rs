//! Simulated field producers.
//!
//! Software stand-ins for the pose producers a real match supplies
//! (pose estimator, opponent tracking, game-piece vision). Each producer
//! owns its object state behind a `Mutex` so the station can advance the
//! simulation while the registry holds non-owning handles; poses are
//! deterministic functions of elapsed time, so a bounded run is
//! reproducible.

use std::f64::consts::{FRAC_PI_2, TAU};
use std::sync::{Arc, Mutex};

use field_common::consts::{FIELD_LENGTH_M, FIELD_WIDTH_M};
use field_common::geometry::{Pose2d, Pose3d, Rotation3d};
use field_common::object::{FieldObject, ObjectHandle, PlanarFieldObject};
use field_registry::{DashboardSink, FieldRegistry, TelemetrySink};

use crate::config::FieldConfig;

/// Type name shared by all simulated opponent robots.
pub const OPPONENT_TYPE: &str = "Opponent";

/// Type name shared by all game pieces, grounded or airborne.
pub const GAME_PIECE_TYPE: &str = "GamePiece";

const GRAVITY_MPS2: f64 = 9.81;

// ─── Primary Robot ──────────────────────────────────────────────────

/// Primary robot stand-in: patrols an oval around the field center,
/// heading tangent to the path.
pub struct SimulatedRobot {
    pose: Mutex<Pose2d>,
}

impl SimulatedRobot {
    /// One lap period [s].
    const LAP_PERIOD_S: f64 = 20.0;

    pub fn new() -> Arc<Self> {
        let robot = Arc::new(Self {
            pose: Mutex::new(Pose2d::identity()),
        });
        robot.drive(0.0);
        robot
    }

    /// Advance the patrol to elapsed time `t` seconds.
    pub fn drive(&self, t: f64) {
        let angle = TAU * t / Self::LAP_PERIOD_S;
        let pose = Pose2d::new(
            FIELD_LENGTH_M / 2.0 + 4.0 * angle.cos(),
            FIELD_WIDTH_M / 2.0 + 2.5 * angle.sin(),
            angle + FRAC_PI_2,
        );
        *self.pose.lock().expect("pose lock poisoned") = pose;
    }
}

impl PlanarFieldObject for SimulatedRobot {
    fn type_name(&self) -> &str {
        "Robot"
    }

    fn pose2d(&self) -> Pose2d {
        *self.pose.lock().expect("pose lock poisoned")
    }
}

// ─── Opponents ──────────────────────────────────────────────────────

/// Opponent robot orbiting a patrol point on its own half of the field.
pub struct OpponentRobot {
    center: Pose2d,
    phase: f64,
    rate: f64,
    pose: Mutex<Pose2d>,
}

impl OpponentRobot {
    const ORBIT_RADIUS_M: f64 = 1.2;

    pub fn new(index: usize) -> Arc<Self> {
        // Spread patrol points along the far half, alternating sides.
        let x = FIELD_LENGTH_M * (0.6 + 0.1 * (index % 4) as f64);
        let y = FIELD_WIDTH_M * if index % 2 == 0 { 0.3 } else { 0.7 };
        let opponent = Arc::new(Self {
            center: Pose2d::new(x, y, 0.0),
            phase: index as f64 * TAU / 3.0,
            rate: 0.4 + 0.1 * index as f64,
            pose: Mutex::new(Pose2d::identity()),
        });
        opponent.drive(0.0);
        opponent
    }

    /// Advance the orbit to elapsed time `t` seconds.
    pub fn drive(&self, t: f64) {
        let angle = self.phase + self.rate * t;
        let pose = Pose2d::new(
            self.center.x + Self::ORBIT_RADIUS_M * angle.cos(),
            self.center.y + Self::ORBIT_RADIUS_M * angle.sin(),
            angle + FRAC_PI_2,
        );
        *self.pose.lock().expect("pose lock poisoned") = pose;
    }
}

impl PlanarFieldObject for OpponentRobot {
    fn type_name(&self) -> &str {
        OPPONENT_TYPE
    }

    fn pose2d(&self) -> Pose2d {
        *self.pose.lock().expect("pose lock poisoned")
    }
}

// ─── Game Pieces ────────────────────────────────────────────────────

/// Stationary game piece on the field carpet.
pub struct GamePieceOnField {
    pose: Pose2d,
}

impl GamePieceOnField {
    pub fn new(index: usize, total: usize) -> Arc<Self> {
        // Staged evenly along the field length, alternating off the
        // center line like a pre-match piece layout.
        let x = FIELD_LENGTH_M * (index + 1) as f64 / (total + 1) as f64;
        let y = FIELD_WIDTH_M * if index % 2 == 0 { 0.4 } else { 0.6 };
        Arc::new(Self {
            pose: Pose2d::new(x, y, 0.0),
        })
    }
}

impl PlanarFieldObject for GamePieceOnField {
    fn type_name(&self) -> &str {
        GAME_PIECE_TYPE
    }

    fn pose2d(&self) -> Pose2d {
        self.pose
    }
}

/// Game piece in flight on a ballistic arc, relaunched each time it
/// lands. Not on the 2D field: the dashboard omits it, the structured
/// log keeps its full spatial pose.
pub struct AirbornePiece {
    launch: Pose2d,
    pose: Mutex<Pose3d>,
}

impl AirbornePiece {
    const LAUNCH_SPEED_MPS: f64 = 6.0;
    const LAUNCH_ELEVATION_RAD: f64 = 1.0;

    pub fn new(launch: Pose2d) -> Arc<Self> {
        let piece = Arc::new(Self {
            launch,
            pose: Mutex::new(Pose3d::identity()),
        });
        piece.fly(0.0);
        piece
    }

    /// Advance the arc to elapsed time `t` seconds.
    pub fn fly(&self, t: f64) {
        let v_up = Self::LAUNCH_SPEED_MPS * Self::LAUNCH_ELEVATION_RAD.sin();
        let v_forward = Self::LAUNCH_SPEED_MPS * Self::LAUNCH_ELEVATION_RAD.cos();
        let flight_time = 2.0 * v_up / GRAVITY_MPS2;

        let phase = t % flight_time;
        let distance = v_forward * phase;
        let elevation = v_up * phase - 0.5 * GRAVITY_MPS2 * phase * phase;
        // Nose follows the velocity vector.
        let pitch = -(v_up - GRAVITY_MPS2 * phase).atan2(v_forward);

        let pose = Pose3d::new(
            self.launch.x + distance * self.launch.theta.cos(),
            self.launch.y + distance * self.launch.theta.sin(),
            elevation.max(0.0),
            Rotation3d::new(0.0, pitch, self.launch.theta),
        );
        *self.pose.lock().expect("pose lock poisoned") = pose;
    }
}

impl FieldObject for AirbornePiece {
    fn type_name(&self) -> &str {
        GAME_PIECE_TYPE
    }

    fn pose3d(&self) -> Pose3d {
        *self.pose.lock().expect("pose lock poisoned")
    }
}

// ─── Field Simulation ───────────────────────────────────────────────

/// Owns every simulated producer and advances them together.
pub struct FieldSimulation {
    robot: Arc<SimulatedRobot>,
    opponents: Vec<Arc<OpponentRobot>>,
    pieces: Vec<Arc<GamePieceOnField>>,
    airborne: Vec<Arc<AirbornePiece>>,
}

impl FieldSimulation {
    /// Build the simulated population described by the configuration.
    pub fn from_config(config: &FieldConfig) -> Self {
        let opponents = (0..config.opponent_count).map(OpponentRobot::new).collect();
        let pieces = (0..config.piece_count)
            .map(|i| GamePieceOnField::new(i, config.piece_count))
            .collect();
        let airborne = (0..config.airborne_piece_count)
            .map(|i| {
                let launch = Pose2d::new(
                    FIELD_LENGTH_M * 0.25,
                    FIELD_WIDTH_M * (i + 1) as f64 / (config.airborne_piece_count + 1) as f64,
                    0.3 * i as f64,
                );
                AirbornePiece::new(launch)
            })
            .collect();

        Self {
            robot: SimulatedRobot::new(),
            opponents,
            pieces,
            airborne,
        }
    }

    /// Handle for the primary robot, for registry construction.
    pub fn robot_handle(&self) -> ObjectHandle {
        self.robot.clone()
    }

    /// Register every non-robot producer with the registry.
    pub fn register_all<D: DashboardSink, T: TelemetrySink>(
        &self,
        registry: &mut FieldRegistry<D, T>,
    ) {
        for opponent in &self.opponents {
            let handle: ObjectHandle = opponent.clone();
            registry.add_object(&handle);
        }
        for piece in &self.pieces {
            let handle: ObjectHandle = piece.clone();
            registry.add_object(&handle);
        }
        for piece in &self.airborne {
            let handle: ObjectHandle = piece.clone();
            registry.add_object(&handle);
        }
    }

    /// Advance every producer to elapsed time `t` seconds.
    pub fn advance(&self, t: f64) {
        self.robot.drive(t);
        for opponent in &self.opponents {
            opponent.drive(t);
        }
        for piece in &self.airborne {
            piece.fly(t);
        }
        // Stationary pieces need no advancing.
    }

    /// Total number of registered (non-robot) producers.
    pub fn object_count(&self) -> usize {
        self.opponents.len() + self.pieces.len() + self.airborne.len()
    }
}
