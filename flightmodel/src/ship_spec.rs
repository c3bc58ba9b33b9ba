use serde::{Deserialize, Serialize};

use crate::Vec3f;

/// A fixed thruster with one or more discrete sub-thruster nozzles.
///
/// Each entry in `directions` is a unit thrust direction in body space; the
/// firing mechanism holds an independent percent in [0,1] per nozzle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThrusterSpec {
    /// Mount point in body space, relative to the hull origin.
    pub pos_body: Vec3f,
    /// Unit thrust directions in body space; one per sub-thruster.
    pub directions: Vec<Vec3f>,
    /// Force in newtons produced by one nozzle at 100%.
    pub max_force: f32,
    pub mass: f32,
}

/// A higher-level drive that consumes raw direction vectors directly and
/// bypasses percent allocation entirely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImpulseEngineSpec {
    pub pos_body: Vec3f,
    /// Peak linear force in newtons along a commanded direction.
    pub max_force: f32,
    /// Peak torque in newton-meters about a commanded axis.
    pub max_torque: f32,
    pub mass: f32,
}

/// Static ship layout: hull plus mounted parts. Body axes follow the standard
/// basis used across the workspace: +Z forward, +Y up, +X right.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipSpec {
    pub name: String,
    pub hull_mass: f32,
    /// Half extents of the hull box, used for the inertia approximation.
    pub hull_half_extents: Vec3f,
    pub thrusters: Vec<ThrusterSpec>,
    pub impulse_engines: Vec<ImpulseEngineSpec>,
}
