use serde::{Deserialize, Serialize};

use crate::{ShipSpec, Vec3f};

/// Mass, center of mass and a diagonal inertia approximation for a ship.
///
/// Snapshotted whenever the helm rebuilds its thrust map; destroyed parts keep
/// their mass (dead weight stays bolted to the hull).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MassProperties {
    pub mass: f32,
    /// Center of mass in body space.
    pub center_of_mass: Vec3f,
    /// Principal moments about the body axes, through the center of mass.
    pub inertia_diag: Vec3f,
}

impl MassProperties {
    /// Box hull plus point-mass parts, parallel-axis corrected.
    pub fn from_spec(spec: &ShipSpec) -> Self {
        let hull_mass = spec.hull_mass.max(0.0);
        let mut mass = hull_mass;
        let mut weighted = Vec3f::ZERO; // hull centered at origin

        for t in &spec.thrusters {
            let m = t.mass.max(0.0);
            mass += m;
            weighted += t.pos_body * m;
        }
        for e in &spec.impulse_engines {
            let m = e.mass.max(0.0);
            mass += m;
            weighted += e.pos_body * m;
        }

        let mass = mass.max(1e-3);
        let com = weighted / mass;

        // Solid box inertia for the hull about its own center.
        let he = spec.hull_half_extents;
        let (wx, wy, wz) = (2.0 * he.x, 2.0 * he.y, 2.0 * he.z);
        let k = hull_mass / 12.0;
        let mut inertia = Vec3f::new(
            k * (wy * wy + wz * wz),
            k * (wx * wx + wz * wz),
            k * (wx * wx + wy * wy),
        );
        // Hull center offset from the combined center of mass.
        inertia += parallel_axis(hull_mass, -com);

        for t in &spec.thrusters {
            inertia += parallel_axis(t.mass.max(0.0), t.pos_body - com);
        }
        for e in &spec.impulse_engines {
            inertia += parallel_axis(e.mass.max(0.0), e.pos_body - com);
        }

        Self {
            mass,
            center_of_mass: com,
            inertia_diag: inertia.max(Vec3f::splat(1e-6)),
        }
    }
}

#[inline]
fn parallel_axis(m: f32, r: Vec3f) -> Vec3f {
    Vec3f::new(
        m * (r.y * r.y + r.z * r.z),
        m * (r.x * r.x + r.z * r.z),
        m * (r.x * r.x + r.y * r.y),
    )
}
