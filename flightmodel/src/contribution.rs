use crate::{MassProperties, ShipSpec, Vec3f};

/// Force and torque produced by one sub-thruster firing at 100%, taken about
/// the ship's current center of mass.
#[derive(Debug, Clone, Copy)]
pub struct ThrustContribution {
    pub thruster: usize,
    pub sub: usize,
    pub force: Vec3f,
    pub torque: Vec3f,
}

/// Snapshot of every live sub-thruster's contribution plus the mass properties
/// it was computed against. Pure function of ship geometry; recomputed whenever
/// mass or the destroyed set changes.
#[derive(Debug, Clone)]
pub struct ContributionModel {
    pub entries: Vec<ThrustContribution>,
    pub mass_props: MassProperties,
}

impl ContributionModel {
    pub fn compute(spec: &ShipSpec, destroyed: &[bool], mass_props: MassProperties) -> Self {
        let mut entries = Vec::new();
        for (ti, t) in spec.thrusters.iter().enumerate() {
            if destroyed.get(ti).copied().unwrap_or(false) {
                continue;
            }
            let r = t.pos_body - mass_props.center_of_mass;
            for (si, dir) in t.directions.iter().enumerate() {
                let force = dir.normalize_or_zero() * t.max_force;
                entries.push(ThrustContribution {
                    thruster: ti,
                    sub: si,
                    force,
                    torque: r.cross(force),
                });
            }
        }
        Self {
            entries,
            mass_props,
        }
    }
}
