//! Headless simulation harness: spawns a ship with a live helm, feeds it
//! scripted key input, and integrates a minimal rigid body from the resulting
//! firing percents. Exists so flight scenarios can run end to end without any
//! rendering or real input stack.

use std::time::Duration;

use bevy::app::ScheduleRunnerPlugin;
use bevy::prelude::*;

pub mod args;
pub mod config;
pub mod script;
pub mod ship;

pub use args::Args;
pub use config::{load_config, Config};
pub use script::{advance_tick, drive_scripted_input, ScriptedInput, ScriptedPress, SimTick};
pub use ship::{
    apply_thruster_damage, spawn_player_ship, step_ships, HelmComp, ShipId, ShipRig,
    ThrusterDamage,
};

pub fn build_sim_app(cfg: Config) -> App {
    let tick = Duration::from_secs_f64(1.0 / cfg.tick_hz.max(1.0) as f64);

    let mut app = App::new();
    app.add_plugins(MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(tick)));
    app.insert_resource(ScriptedInput {
        presses: cfg.script.clone(),
    });
    app.insert_resource(cfg);
    app.init_resource::<SimTick>();
    app.add_event::<ThrusterDamage>();
    app.add_systems(Startup, spawn_player_ship);
    app.add_systems(
        Update,
        (
            drive_scripted_input,
            apply_thruster_damage,
            step_ships,
            advance_tick,
            exit_after_ticks,
        )
            .chain(),
    );
    app
}

/// Bounded runs for scripted scenarios; no-op unless `--ticks` was given.
fn exit_after_ticks(args: Option<Res<Args>>, tick: Res<SimTick>, mut exit: EventWriter<AppExit>) {
    if let Some(args) = args {
        if args.ticks > 0 && tick.0 >= args.ticks {
            exit.write(AppExit::Success);
        }
    }
}
