use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

use helm::Key;

use crate::ship::HelmComp;

/// Hold `key` from `from_tick` (inclusive) until `to_tick` (exclusive).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptedPress {
    pub key: Key,
    pub from_tick: u64,
    pub to_tick: u64,
}

/// Ticks elapsed since startup. Advances once per update, after the ships
/// have stepped.
#[derive(Resource, Default)]
pub struct SimTick(pub u64);

#[derive(Resource, Default, Debug, Clone)]
pub struct ScriptedInput {
    pub presses: Vec<ScriptedPress>,
}

/// Turn the tick script into key edges on every helm. Only the boundary ticks
/// matter; the helm tracks held state itself.
pub fn drive_scripted_input(
    tick: Res<SimTick>,
    script: Res<ScriptedInput>,
    mut helms: Query<&mut HelmComp>,
) {
    for press in &script.presses {
        if tick.0 == press.from_tick {
            for mut helm in helms.iter_mut() {
                helm.0.key_down(press.key);
            }
        }
        if tick.0 == press.to_tick {
            for mut helm in helms.iter_mut() {
                helm.0.key_up(press.key);
            }
        }
    }
}

pub fn advance_tick(mut tick: ResMut<SimTick>) {
    tick.0 += 1;
}
