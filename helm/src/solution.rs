use std::sync::Arc;

use parking_lot::RwLock;

use flightmodel::{ContributionModel, ThrusterSolutionMap};

use crate::request::KeyThrustRequest;

/// Published-value cell for the latest solver result.
///
/// Single writer (the solver thread), read from the simulation thread every
/// tick. Only the newest value matters and stale reads are tolerated, so the
/// cell is a plain latest-wins swap with no further coordination.
#[derive(Debug, Default)]
pub struct SharedMap(RwLock<Option<Arc<ThrusterSolutionMap>>>);

impl SharedMap {
    pub fn publish(&self, map: ThrusterSolutionMap) {
        *self.0.write() = Some(Arc::new(map));
    }

    pub fn load(&self) -> Option<Arc<ThrusterSolutionMap>> {
        self.0.read().clone()
    }
}

/// One key binding's view of a solve in progress.
///
/// All bindings whose requests deduplicate to the same physical direction hold
/// the same `shared` cell, so an improvement published by the solver becomes
/// visible to every one of them on its next read. The model snapshot is the
/// geometry (and mass/inertia) the solve was requested against; if the ship
/// changes before the solve completes the result is stale but not invalid.
#[derive(Debug, Clone)]
pub struct ThrusterSolution {
    pub request: KeyThrustRequest,
    pub model: Arc<ContributionModel>,
    pub shared: Arc<SharedMap>,
}

impl ThrusterSolution {
    pub fn map(&self) -> Option<Arc<ThrusterSolutionMap>> {
        self.shared.load()
    }
}
