// Math types are bevy_math re-exports so the sim can use them directly.
pub type Vec3f = bevy_math::Vec3;
pub type Quatf = bevy_math::Quat;

/// Tolerance for treating two direction vectors as the same physical request.
pub const DIR_EPSILON: f32 = 1e-3;
