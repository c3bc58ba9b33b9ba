use bevy_ecs::prelude::*;
use tracing::{error, warn};
use uuid::Uuid;

use flightmodel::{builtins, MassProperties, Quatf, Vec3f};
use helm::Helm;

use crate::config::Config;
use crate::script::SimTick;

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShipId(pub Uuid);

#[derive(Component)]
pub struct HelmComp(pub Helm);

/// Minimal rigid body, just enough to fly scripted scenarios end to end.
/// Linear state in world space; angular velocity in body space.
#[derive(Component, Debug, Clone)]
pub struct ShipRig {
    pub position: Vec3f,
    pub velocity: Vec3f,
    pub orientation: Quatf,
    pub ang_vel: Vec3f,
}

impl Default for ShipRig {
    fn default() -> Self {
        Self {
            position: Vec3f::ZERO,
            velocity: Vec3f::ZERO,
            orientation: Quatf::IDENTITY,
            ang_vel: Vec3f::ZERO,
        }
    }
}

/// Damage/repair notification for one thruster on one ship.
#[derive(Event, Debug, Clone, Copy)]
pub struct ThrusterDamage {
    pub ship: Uuid,
    pub thruster: usize,
    pub destroyed: bool,
}

pub fn spawn_player_ship(mut commands: Commands, cfg: Res<Config>) {
    let spec = builtins::by_name(&cfg.ship).unwrap_or_else(|| {
        warn!(ship = %cfg.ship, "unknown builtin ship; spawning the mining skiff");
        builtins::mining_skiff_spec()
    });
    commands.spawn((
        ShipId(Uuid::new_v4()),
        HelmComp(Helm::with_default_bindings(spec)),
        ShipRig::default(),
    ));
}

pub fn apply_thruster_damage(
    mut events: EventReader<ThrusterDamage>,
    mut ships: Query<(&ShipId, &mut HelmComp)>,
) {
    for ev in events.read() {
        for (id, mut helm) in ships.iter_mut() {
            if id.0 != ev.ship {
                continue;
            }
            if ev.destroyed {
                helm.0.note_thruster_destroyed(ev.thruster);
            } else {
                helm.0.note_thruster_resurrected(ev.thruster);
            }
        }
    }
}

/// Per-tick flight step: allocate thrust, then integrate each rig.
pub fn step_ships(
    cfg: Res<Config>,
    tick: Res<SimTick>,
    mut ships: Query<(&ShipId, &mut HelmComp, &mut ShipRig)>,
) {
    let dt = 1.0 / cfg.tick_hz.max(1.0);
    for (id, mut helm, mut rig) in ships.iter_mut() {
        if let Err(err) = helm.0.update() {
            error!(ship = %id.0, tick = tick.0, %err, "helm update failed; ship coasts this tick");
            continue;
        }
        integrate_rig(&helm.0, &mut rig, dt);
    }
}

fn integrate_rig(helm: &Helm, rig: &mut ShipRig, dt: f32) {
    let spec = helm.spec();
    let props = MassProperties::from_spec(spec);

    let mut force = Vec3f::ZERO;
    let mut torque = Vec3f::ZERO;
    for (ti, thruster) in spec.thrusters.iter().enumerate() {
        let r = thruster.pos_body - props.center_of_mass;
        for (si, dir) in thruster.directions.iter().enumerate() {
            // Accumulated percents may exceed 1.0; the clamp lives here, at
            // fire time.
            let p = helm.fire_percents()[ti][si].clamp(0.0, 1.0);
            if p <= 0.0 {
                continue;
            }
            let f = dir.normalize_or_zero() * (thruster.max_force * p);
            force += f;
            torque += r.cross(f);
        }
    }
    if let Some(directive) = helm.impulse_directive() {
        for engine in &spec.impulse_engines {
            force += directive.linear * engine.max_force;
            torque += directive.rotate * engine.max_torque;
        }
    }

    let world_force = rig.orientation * force;
    rig.velocity += world_force / props.mass * dt;
    rig.position += rig.velocity * dt;

    let ang_accel = torque / props.inertia_diag;
    rig.ang_vel += ang_accel * dt;
    rig.orientation = (rig.orientation * Quatf::from_scaled_axis(rig.ang_vel * dt)).normalize();
}
