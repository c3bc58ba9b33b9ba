//! Shared flight-model data for the helm and the sim harness.
//!
//! This crate intentionally avoids any engine types beyond `bevy_math`. It
//! exposes a simple, serializable ship schema plus the pure math the thrust
//! allocator needs: mass properties, per-thruster force/torque contributions,
//! and the derivation of achieved accelerations from a percent allocation.

mod math;
pub use math::{Quatf, Vec3f, DIR_EPSILON};

mod ship_spec;
pub use ship_spec::{ImpulseEngineSpec, ShipSpec, ThrusterSpec};

pub mod builtins;

mod mass;
pub use mass::MassProperties;

mod contribution;
pub use contribution::{ContributionModel, ThrustContribution};

mod solution;
pub use solution::{solution_map_from_percents, ThrusterHit, ThrusterSolutionMap};
