use serde::{Deserialize, Serialize};

use flightmodel::{Vec3f, DIR_EPSILON};

use crate::keys::Key;

/// A binding from an input key to a desired acceleration.
///
/// `linear` is a unit direction in body space, `rotate` a unit rotation axis;
/// at least one should be set for the binding to produce thrust. The optional
/// caps are acceleration limits the allocator scales down to at apply time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyThrustRequest {
    pub key: Key,
    /// `Some(state)` binds to that shift state only; `None` binds regardless.
    pub shift: Option<bool>,
    pub linear: Option<Vec3f>,
    pub rotate: Option<Vec3f>,
    /// Cap on linear acceleration in m/s².
    pub max_linear: Option<f32>,
    /// Cap on angular acceleration in rad/s².
    pub max_rotate: Option<f32>,
}

/// Canonicalized hash/equality identity of a (linear, rotate) pair: two
/// requests are the same physical request when each half is either null in
/// both or within direction tolerance in both. Directions are snapped to a
/// grid a few epsilons wide so near-equal requests collapse to one key,
/// making the equivalence test a plain hash lookup. Used for deduplicating
/// solver runs and for warm-start lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestIdentity {
    linear: Option<[i32; 3]>,
    rotate: Option<[i32; 3]>,
}

impl RequestIdentity {
    pub fn of(req: &KeyThrustRequest) -> Self {
        Self {
            linear: req.linear.map(quantize),
            rotate: req.rotate.map(quantize),
        }
    }
}

fn quantize(v: Vec3f) -> [i32; 3] {
    let cell = 4.0 * DIR_EPSILON;
    [
        (v.x / cell).round() as i32,
        (v.y / cell).round() as i32,
        (v.z / cell).round() as i32,
    ]
}

/// Linear-acceleration cap used by the precision (shift) variants.
pub const PRECISION_LINEAR: f32 = 2.0;
/// Angular-acceleration cap used by the precision (shift) variants.
pub const PRECISION_ROTATE: f32 = 0.35;

/// Stock binding table: WASD+QE plus arrows, with shift selecting precision
/// variants. W and Up (likewise S/Down, A/Left, D/Right) deliberately request
/// the same physical direction and must collapse to one solver run.
pub fn default_bindings() -> Vec<KeyThrustRequest> {
    let fwd = Vec3f::Z;
    let back = Vec3f::NEG_Z;
    let strafe_l = Vec3f::NEG_X;
    let strafe_r = Vec3f::X;
    let yaw_l = Vec3f::Y;
    let yaw_r = Vec3f::NEG_Y;

    let mut out = Vec::new();
    let mut linear = |key: Key, dir: Vec3f| {
        out.push(bind(key, Some(false), Some(dir), None, None, None));
        out.push(bind(
            key,
            Some(true),
            Some(dir),
            None,
            Some(PRECISION_LINEAR),
            None,
        ));
    };
    linear(Key::W, fwd);
    linear(Key::S, back);
    linear(Key::Q, strafe_l);
    linear(Key::E, strafe_r);

    let mut rotate = |key: Key, axis: Vec3f| {
        out.push(bind(key, Some(false), None, Some(axis), None, None));
        out.push(bind(
            key,
            Some(true),
            None,
            Some(axis),
            None,
            Some(PRECISION_ROTATE),
        ));
    };
    rotate(Key::A, yaw_l);
    rotate(Key::D, yaw_r);

    // Arrow keys ignore shift entirely.
    out.push(bind(Key::Up, None, Some(fwd), None, None, None));
    out.push(bind(Key::Down, None, Some(back), None, None, None));
    out.push(bind(Key::Left, None, None, Some(yaw_l), None, None));
    out.push(bind(Key::Right, None, None, Some(yaw_r), None, None));
    out
}

fn bind(
    key: Key,
    shift: Option<bool>,
    linear: Option<Vec3f>,
    rotate: Option<Vec3f>,
    max_linear: Option<f32>,
    max_rotate: Option<f32>,
) -> KeyThrustRequest {
    KeyThrustRequest {
        key,
        shift,
        linear,
        rotate,
        max_linear,
        max_rotate,
    }
}
