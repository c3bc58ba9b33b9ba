use crate::{ContributionModel, Vec3f};

/// One used sub-thruster in a solution, with its assigned firing percent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThrusterHit {
    pub thruster: usize,
    pub sub: usize,
    pub percent: f32,
}

/// A percent allocation plus the accelerations it achieves against the
/// mass/inertia the solve ran with. The accel magnitudes are computed once at
/// solve time and are not refreshed per frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ThrusterSolutionMap {
    pub used: Vec<ThrusterHit>,
    /// Achieved linear acceleration magnitude in m/s².
    pub linear_accel: f32,
    /// Achieved angular acceleration magnitude in rad/s².
    pub rotate_accel: f32,
}

const USED_MIN_PERCENT: f32 = 1e-4;

/// Derive a solution map from a dense percent vector parallel to
/// `model.entries`. Net force divided by mass gives the linear term; net
/// torque through the diagonal inertia gives the angular term. Non-finite
/// results normalize to zero, which legitimately happens when the net torque
/// is exactly zero.
pub fn solution_map_from_percents(model: &ContributionModel, percents: &[f32]) -> ThrusterSolutionMap {
    debug_assert_eq!(percents.len(), model.entries.len());

    let mut force = Vec3f::ZERO;
    let mut torque = Vec3f::ZERO;
    let mut used = Vec::new();

    for (entry, &p) in model.entries.iter().zip(percents) {
        let p = p.clamp(0.0, 1.0);
        if p < USED_MIN_PERCENT {
            continue;
        }
        force += entry.force * p;
        torque += entry.torque * p;
        used.push(ThrusterHit {
            thruster: entry.thruster,
            sub: entry.sub,
            percent: p,
        });
    }

    let linear_accel = finite_or_zero(force.length() / model.mass_props.mass);
    let ang = torque / model.mass_props.inertia_diag;
    let rotate_accel = finite_or_zero(ang.length());

    ThrusterSolutionMap {
        used,
        linear_accel,
        rotate_accel,
    }
}

#[inline]
fn finite_or_zero(v: f32) -> f32 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins::twin_tug_spec;
    use crate::{ContributionModel, MassProperties};

    fn twin_tug_model() -> ContributionModel {
        let spec = twin_tug_spec();
        let props = MassProperties::from_spec(&spec);
        ContributionModel::compute(&spec, &[false, false], props)
    }

    #[test]
    fn repeated_derivation_is_deterministic() {
        let model = twin_tug_model();
        let percents = [0.7, 0.4];
        let a = solution_map_from_percents(&model, &percents);
        let b = solution_map_from_percents(&model, &percents);
        assert_eq!(a, b);
    }

    #[test]
    fn zero_net_torque_yields_exactly_zero_rotate_accel() {
        let model = twin_tug_model();
        // Equal fire on a symmetric pair cancels torque exactly.
        let map = solution_map_from_percents(&model, &[1.0, 1.0]);
        assert_eq!(map.rotate_accel, 0.0);
        assert!(map.linear_accel > 0.0);
    }

    #[test]
    fn degenerate_inertia_normalizes_to_zero_not_nan() {
        let mut model = twin_tug_model();
        model.mass_props.inertia_diag = Vec3f::ZERO;
        let map = solution_map_from_percents(&model, &[1.0, 0.2]);
        assert!(map.rotate_accel == 0.0, "expected 0, got {}", map.rotate_accel);
    }

    #[test]
    fn tiny_percents_are_dropped_from_used_list() {
        let model = twin_tug_model();
        let map = solution_map_from_percents(&model, &[0.5, 1e-6]);
        assert_eq!(map.used.len(), 1);
        assert_eq!(map.used[0].thruster, 0);
    }
}
