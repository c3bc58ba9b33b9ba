//! Sign conventions for thrust torques in the +Z forward, +Y up, +X right
//! body basis. These pin the cross-product orientation the whole allocator
//! rests on; if one of these flips, every solved map is mirrored.

use flightmodel::{ContributionModel, MassProperties, ShipSpec, ThrusterSpec, Vec3f};

fn single_thruster_rig(pos: Vec3f, dir: Vec3f) -> ShipSpec {
    ShipSpec {
        name: "test_rig".to_string(),
        hull_mass: 1000.0,
        hull_half_extents: Vec3f::new(1.0, 1.0, 2.0),
        thrusters: vec![ThrusterSpec {
            pos_body: pos,
            directions: vec![dir],
            max_force: 1000.0,
            mass: 0.0,
        }],
        impulse_engines: vec![],
    }
}

fn sole_torque(pos: Vec3f, dir: Vec3f) -> Vec3f {
    let spec = single_thruster_rig(pos, dir);
    let props = MassProperties::from_spec(&spec);
    let model = ContributionModel::compute(&spec, &[false], props);
    assert_eq!(model.entries.len(), 1);
    model.entries[0].torque
}

#[test]
fn bow_starboard_thrust_torques_positive_yaw() {
    let torque = sole_torque(Vec3f::new(0.0, 0.0, 3.0), Vec3f::X);
    assert!(torque.y > 0.0, "bow +X thrust must yaw about +Y: {torque:?}");
    assert!(torque.x.abs() < 1e-3);
    assert!(torque.z.abs() < 1e-3);
}

#[test]
fn stern_starboard_thrust_torques_negative_yaw() {
    let torque = sole_torque(Vec3f::new(0.0, 0.0, -3.0), Vec3f::X);
    assert!(torque.y < 0.0, "stern +X thrust must yaw about -Y: {torque:?}");
}

#[test]
fn high_mounted_forward_thrust_pitches_about_positive_x() {
    let torque = sole_torque(Vec3f::new(0.0, 2.0, 0.0), Vec3f::Z);
    assert!(torque.x > 0.0, "{torque:?}");
    assert!(torque.y.abs() < 1e-3);
}

#[test]
fn thrust_through_the_center_of_mass_is_torque_free() {
    let torque = sole_torque(Vec3f::ZERO, Vec3f::X);
    assert!(torque.length() < 1e-3, "{torque:?}");
}

#[test]
fn centerline_main_drive_is_torque_free() {
    let torque = sole_torque(Vec3f::new(0.0, 0.0, -3.0), Vec3f::Z);
    assert!(torque.length() < 1e-3, "{torque:?}");
}
