use crate::{ImpulseEngineSpec, ShipSpec, ThrusterSpec, Vec3f};

/// Minimal test body: two identical main drives mirrored across the
/// centerline, both pushing +Z. Equal fire gives pure forward force with zero
/// net torque; differential fire yaws.
pub fn twin_tug_spec() -> ShipSpec {
    let drive = |x: f32| ThrusterSpec {
        pos_body: Vec3f::new(x, 0.0, -2.5),
        directions: vec![Vec3f::new(0.0, 0.0, 1.0)],
        max_force: 12_000.0,
        mass: 100.0,
    };
    ShipSpec {
        name: "twin_tug".to_string(),
        hull_mass: 1800.0,
        hull_half_extents: Vec3f::new(2.0, 1.0, 3.0),
        thrusters: vec![drive(-2.0), drive(2.0)],
        impulse_engines: vec![],
    }
}

/// The default player ship: an asymmetric miner with paired mains, an
/// off-center retro, bow/stern lateral clusters and one impulse drive.
/// Deliberately not mirror-symmetric so the solver has real work to do.
pub fn mining_skiff_spec() -> ShipSpec {
    let fwd = Vec3f::new(0.0, 0.0, 1.0);
    let back = Vec3f::new(0.0, 0.0, -1.0);
    let right = Vec3f::new(1.0, 0.0, 0.0);
    let left = Vec3f::new(-1.0, 0.0, 0.0);

    ShipSpec {
        name: "mining_skiff".to_string(),
        hull_mass: 2600.0,
        hull_half_extents: Vec3f::new(1.8, 1.2, 3.5),
        thrusters: vec![
            // Main drives
            ThrusterSpec {
                pos_body: Vec3f::new(-1.5, 0.0, -3.0),
                directions: vec![fwd],
                max_force: 16_000.0,
                mass: 140.0,
            },
            ThrusterSpec {
                pos_body: Vec3f::new(1.5, 0.0, -3.0),
                directions: vec![fwd],
                max_force: 16_000.0,
                mass: 140.0,
            },
            // Retro, mounted slightly starboard of the centerline
            ThrusterSpec {
                pos_body: Vec3f::new(0.4, 0.0, 3.0),
                directions: vec![back],
                max_force: 6_000.0,
                mass: 80.0,
            },
            // Bow lateral cluster (two nozzles)
            ThrusterSpec {
                pos_body: Vec3f::new(0.0, 0.0, 2.8),
                directions: vec![right, left],
                max_force: 2_500.0,
                mass: 50.0,
            },
            // Stern lateral cluster, slightly off-center
            ThrusterSpec {
                pos_body: Vec3f::new(0.2, 0.0, -2.8),
                directions: vec![right, left],
                max_force: 2_500.0,
                mass: 50.0,
            },
        ],
        impulse_engines: vec![ImpulseEngineSpec {
            pos_body: Vec3f::new(0.0, 0.0, 0.5),
            max_force: 4_000.0,
            max_torque: 3_000.0,
            mass: 220.0,
        }],
    }
}

/// Look up a builtin ship by its spec name.
pub fn by_name(name: &str) -> Option<ShipSpec> {
    match name {
        "twin_tug" => Some(twin_tug_spec()),
        "mining_skiff" => Some(mining_skiff_spec()),
        "impulse_hauler" => Some(impulse_hauler_spec()),
        _ => None,
    }
}

/// A hauler with no classic thrusters at all; flies on its impulse drive
/// alone. Valid: the helm must not launch any solver work for it.
pub fn impulse_hauler_spec() -> ShipSpec {
    ShipSpec {
        name: "impulse_hauler".to_string(),
        hull_mass: 5200.0,
        hull_half_extents: Vec3f::new(2.5, 2.0, 5.0),
        thrusters: vec![],
        impulse_engines: vec![ImpulseEngineSpec {
            pos_body: Vec3f::new(0.0, 0.0, -1.0),
            max_force: 9_000.0,
            max_torque: 7_000.0,
            mass: 600.0,
        }],
    }
}
