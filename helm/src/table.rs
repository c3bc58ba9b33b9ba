use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::debug;

use flightmodel::{ContributionModel, ThrusterHit, Vec3f};

use crate::keys::Key;
use crate::request::{KeyThrustRequest, RequestIdentity};
use crate::solution::{SharedMap, ThrusterSolution};
use crate::solver::{SolveRequest, SolverWorker};

/// One deduplicated solver launch: the representative direction pair, the cell
/// every binding in the group reads from, and an optional warm-start seed
/// harvested from the previous generation.
#[derive(Debug)]
pub struct SolveJobSpec {
    pub linear: Option<Vec3f>,
    pub rotate: Option<Vec3f>,
    pub seed: Option<Vec<ThrusterHit>>,
    pub shared: Arc<SharedMap>,
}

/// The (key, shift) → solution cache. Fully reconstructed on every dirtying
/// event; thruster indices and availability can shift, so entries are never
/// patched in place.
#[derive(Debug, Default)]
pub struct SolutionTable {
    entries: HashMap<(Key, Option<bool>), ThrusterSolution>,
    cancel: Option<Arc<AtomicBool>>,
}

impl SolutionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Exact (key, shift) match first, then the shift-insensitive binding.
    pub fn resolve(&self, key: Key, shift: bool) -> Option<&ThrusterSolution> {
        self.entries
            .get(&(key, Some(shift)))
            .or_else(|| self.entries.get(&(key, None)))
    }

    /// Cancel in-flight work and drop all entries.
    pub fn clear(&mut self) {
        self.cancel_inflight();
        self.entries.clear();
    }

    pub fn cancel_inflight(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel.store(true, Ordering::Release);
        }
    }

    /// Tear down the previous generation and launch one solver job per
    /// distinct physical request, seeding each from an equivalent previous
    /// solution when one exists.
    pub fn rebuild(
        &mut self,
        requests: &[KeyThrustRequest],
        model: Arc<ContributionModel>,
        worker: &SolverWorker,
    ) {
        let jobs = self.plan(requests, model.clone());
        let Some(cancel) = self.cancel.clone() else {
            return; // nothing to solve
        };
        debug!(groups = jobs.len(), entries = self.entries.len(), "launching solver generation");
        for job in jobs {
            worker.submit(SolveRequest {
                linear: job.linear,
                rotate: job.rotate,
                model: model.clone(),
                seed: job.seed,
                cancel: cancel.clone(),
                shared: job.shared,
            });
        }
    }

    /// Pure planning half of `rebuild`: cancels the old generation, snapshots
    /// warm starts, regroups requests and repopulates the table. Returns the
    /// deduplicated jobs to launch. Kept separate so tests can inspect seeds
    /// and grouping without a live worker.
    pub(crate) fn plan(
        &mut self,
        requests: &[KeyThrustRequest],
        model: Arc<ContributionModel>,
    ) -> Vec<SolveJobSpec> {
        self.cancel_inflight();

        // Previous generation's best maps, keyed by physical request.
        let mut warm: HashMap<RequestIdentity, Vec<ThrusterHit>> = HashMap::new();
        for sol in self.entries.values() {
            if let Some(map) = sol.map() {
                warm.entry(RequestIdentity::of(&sol.request))
                    .or_insert_with(|| map.used.clone());
            }
        }
        self.entries.clear();

        if model.entries.is_empty() {
            // No live thrusters: valid (impulse-only ships exist), nothing to
            // solve and no generation token to hand out.
            return Vec::new();
        }

        self.cancel = Some(Arc::new(AtomicBool::new(false)));

        let mut groups: HashMap<RequestIdentity, usize> = HashMap::new();
        let mut jobs: Vec<SolveJobSpec> = Vec::new();
        for req in requests {
            if req.linear.is_none() && req.rotate.is_none() {
                continue;
            }
            let id = RequestIdentity::of(req);
            let job_ix = *groups.entry(id).or_insert_with(|| {
                jobs.push(SolveJobSpec {
                    linear: req.linear,
                    rotate: req.rotate,
                    seed: warm.remove(&id),
                    shared: Arc::new(SharedMap::default()),
                });
                jobs.len() - 1
            });
            self.entries.insert(
                (req.key, req.shift),
                ThrusterSolution {
                    request: req.clone(),
                    model: model.clone(),
                    shared: jobs[job_ix].shared.clone(),
                },
            );
        }
        jobs
    }
}

impl Drop for SolutionTable {
    fn drop(&mut self) {
        self.cancel_inflight();
    }
}
