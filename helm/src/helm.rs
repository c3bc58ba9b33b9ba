use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, info};

use flightmodel::{
    ContributionModel, MassProperties, ShipSpec, ThrusterSolutionMap, Vec3f,
};

use crate::error::HelmError;
use crate::keys::Key;
use crate::request::KeyThrustRequest;
use crate::solution::ThrusterSolution;
use crate::solver::SolverWorker;
use crate::table::SolutionTable;

/// One per-tick command for the ship's impulse engines, which consume raw
/// directions instead of percent allocations. All held keys' requested
/// directions are batched into a single directive per tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpulseDirective {
    pub linear: Vec3f,
    pub rotate: Vec3f,
}

/// One ship's thrust control state: the binding table, the solution cache and
/// its solver worker, and the live firing percents the simulation reads.
///
/// Owned by the simulation thread. The only cross-thread traffic is the
/// solver's published-map cells and the dirty flag, which damage handling may
/// set from anywhere.
pub struct Helm {
    spec: ShipSpec,
    bindings: Vec<KeyThrustRequest>,
    destroyed: Vec<bool>,
    /// Live firing percents, `[thruster][sub]`, rewritten every tick.
    percents: Vec<Vec<f32>>,
    impulse: Option<ImpulseDirective>,
    held: HashSet<Key>,
    shift_down: bool,
    gun_firing: bool,
    dirty: AtomicBool,
    // Declaration order matters for Drop: the table cancels the in-flight
    // generation before the worker disconnects and joins.
    table: SolutionTable,
    worker: SolverWorker,
}

impl Helm {
    pub fn new(spec: ShipSpec, bindings: Vec<KeyThrustRequest>) -> Self {
        let percents = spec
            .thrusters
            .iter()
            .map(|t| vec![0.0; t.directions.len()])
            .collect();
        let destroyed = vec![false; spec.thrusters.len()];
        Self {
            spec,
            bindings,
            destroyed,
            percents,
            impulse: None,
            held: HashSet::new(),
            shift_down: false,
            gun_firing: false,
            // Dirty from birth so the first tick with a key held solves.
            dirty: AtomicBool::new(true),
            table: SolutionTable::new(),
            worker: SolverWorker::spawn(),
        }
    }

    pub fn with_default_bindings(spec: ShipSpec) -> Self {
        Self::new(spec, crate::request::default_bindings())
    }

    /// Per-tick allocation pass. Rewrites the firing percents and the impulse
    /// directive from scratch; nothing carries over from the previous tick.
    pub fn update(&mut self) -> Result<(), HelmError> {
        for thruster in &mut self.percents {
            for p in thruster.iter_mut() {
                *p = 0.0;
            }
        }
        self.impulse = None;

        if self.held.is_empty() {
            return Ok(());
        }
        if self.dirty.swap(false, Ordering::AcqRel) {
            self.rebuild();
        }

        let mut linear_sum = Vec3f::ZERO;
        let mut rotate_sum = Vec3f::ZERO;
        let mut any_bound = false;
        for &key in &self.held {
            // Raw directions come from the binding table, not the solution
            // table: an impulse-only ship has no solutions but still steers.
            let Some(req) = resolve_binding(&self.bindings, key, self.shift_down) else {
                continue;
            };
            any_bound = true;
            if let Some(dir) = req.linear {
                linear_sum += dir;
            }
            if let Some(axis) = req.rotate {
                rotate_sum += axis;
            }

            // No published map yet: the key contributes nothing this tick.
            let Some(map) = self
                .table
                .resolve(key, self.shift_down)
                .and_then(|sol| sol.map())
            else {
                continue;
            };
            let allocation = cap_allocation(req, &map);
            for hit in &map.used {
                if self.destroyed.get(hit.thruster).copied().unwrap_or(false) {
                    // Stale map from before the damage; the rebuild is already
                    // pending and the dead thruster must stay silent.
                    continue;
                }
                let slot = self
                    .percents
                    .get_mut(hit.thruster)
                    .and_then(|t| t.get_mut(hit.sub))
                    .ok_or(HelmError::ContributionDesync {
                        thruster: hit.thruster,
                        sub: hit.sub,
                    })?;
                *slot += hit.percent * allocation;
            }
        }

        if any_bound && !self.spec.impulse_engines.is_empty() {
            self.impulse = Some(ImpulseDirective {
                linear: linear_sum.normalize_or_zero(),
                rotate: rotate_sum.normalize_or_zero(),
            });
        }
        Ok(())
    }

    fn rebuild(&mut self) {
        let props = MassProperties::from_spec(&self.spec);
        let model = ContributionModel::compute(&self.spec, &self.destroyed, props);
        debug!(
            live_entries = model.entries.len(),
            mass = props.mass,
            "rebuilding solution table"
        );
        self.table
            .rebuild(&self.bindings, Arc::new(model), &self.worker);
    }

    pub fn key_down(&mut self, key: Key) {
        match key {
            Key::Shift => self.shift_down = true,
            Key::Ctrl => self.gun_firing = !self.gun_firing,
            _ => {
                self.held.insert(key);
            }
        }
    }

    pub fn key_up(&mut self, key: Key) {
        match key {
            Key::Shift => self.shift_down = false,
            Key::Ctrl => {}
            _ => {
                self.held.remove(&key);
            }
        }
    }

    pub fn note_thruster_destroyed(&mut self, thruster: usize) {
        if let Some(flag) = self.destroyed.get_mut(thruster) {
            if !*flag {
                *flag = true;
                info!(thruster, "thruster destroyed; solutions invalidated");
                self.dirty.store(true, Ordering::Release);
            }
        }
    }

    pub fn note_thruster_resurrected(&mut self, thruster: usize) {
        if let Some(flag) = self.destroyed.get_mut(thruster) {
            if *flag {
                *flag = false;
                info!(thruster, "thruster restored; solutions invalidated");
                self.dirty.store(true, Ordering::Release);
            }
        }
    }

    /// Mass or center of mass moved (cargo, part loss); every torque arm is
    /// stale and the table must be rebuilt.
    pub fn note_mass_changed(&self) {
        self.dirty.store(true, Ordering::Release);
    }

    /// Live firing percents, `[thruster][sub]`. Accumulated values may exceed
    /// 1.0 when held keys overlap; clamping is the firing mechanism's job.
    pub fn fire_percents(&self) -> &[Vec<f32>] {
        &self.percents
    }

    pub fn impulse_directive(&self) -> Option<ImpulseDirective> {
        self.impulse
    }

    pub fn solution_for(&self, key: Key, shift: bool) -> Option<&ThrusterSolution> {
        self.table.resolve(key, shift)
    }

    pub fn gun_firing(&self) -> bool {
        self.gun_firing
    }

    pub fn spec(&self) -> &ShipSpec {
        &self.spec
    }
}

/// Exact (key, shift) binding first, then the shift-insensitive one. Same
/// fallback order as the solution table.
fn resolve_binding(
    bindings: &[KeyThrustRequest],
    key: Key,
    shift: bool,
) -> Option<&KeyThrustRequest> {
    bindings
        .iter()
        .find(|r| r.key == key && r.shift == Some(shift))
        .or_else(|| bindings.iter().find(|r| r.key == key && r.shift.is_none()))
}

/// Down-scale factor applied to a map so the achieved accelerations respect
/// the request's caps. Never scales up.
fn cap_allocation(req: &KeyThrustRequest, map: &ThrusterSolutionMap) -> f32 {
    let mut alloc = 1.0_f32;
    if let Some(max) = req.max_linear {
        if map.linear_accel > max {
            alloc = alloc.min(max / map.linear_accel);
        }
    }
    if let Some(max) = req.max_rotate {
        if map.rotate_accel > max {
            alloc = alloc.min(max / map.rotate_accel);
        }
    }
    alloc
}
