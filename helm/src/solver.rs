use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, error};

use flightmodel::{solution_map_from_percents, ContributionModel, ThrusterHit, Vec3f};

use crate::solution::SharedMap;

/// One solve to run on the worker: find a percent allocation whose net
/// force/torque best matches the requested direction pair. At least one of
/// `linear`/`rotate` is set.
pub struct SolveRequest {
    pub linear: Option<Vec3f>,
    pub rotate: Option<Vec3f>,
    pub model: Arc<ContributionModel>,
    /// Previous generation's allocation for an equivalent request, if any.
    pub seed: Option<Vec<ThrusterHit>>,
    pub cancel: Arc<AtomicBool>,
    pub shared: Arc<SharedMap>,
}

/// Dedicated single-thread solver scheduler.
///
/// One long-lived worker per ship, deliberately not the global thread pool:
/// the search is iterative and long-running, and a single worker both keeps it
/// off the simulation thread and bounds concurrent solver work to one ship's
/// worth. Queued jobs advance round-robin in fixed iteration slices so a
/// many-direction rebuild makes progress on every group at once.
pub struct SolverWorker {
    tx: Option<Sender<SolveRequest>>,
    handle: Option<JoinHandle<()>>,
}

impl SolverWorker {
    pub fn spawn() -> Self {
        let (tx, rx) = mpsc::channel();
        let handle = std::thread::Builder::new()
            .name("helm-solver".into())
            .spawn(move || worker_loop(rx))
            .expect("spawn helm solver thread");
        Self {
            tx: Some(tx),
            handle: Some(handle),
        }
    }

    pub fn submit(&self, req: SolveRequest) {
        if let Some(tx) = &self.tx {
            // A closed channel means the worker is gone; the ship is being
            // torn down and dropping the job is fine.
            let _ = tx.send(req);
        }
    }
}

impl Drop for SolverWorker {
    fn drop(&mut self) {
        self.tx.take(); // disconnect; the worker exits once idle
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Iterations granted to each active job per round-robin turn.
const SLICE_ITERS: usize = 64;
/// Hard iteration cap per job.
const MAX_ITERS: usize = 4096;
/// Give up after this many consecutive non-improving proposals.
const STALL_LIMIT: usize = 512;
/// Minimum score gain counted as an improvement worth publishing.
const SCORE_EPS: f32 = 1e-6;
/// Weight on unwanted acceleration components relative to wanted ones.
const OFF_AXIS_PENALTY: f32 = 2.0;

fn worker_loop(rx: Receiver<SolveRequest>) {
    let mut active: Vec<SolveJob> = Vec::new();
    loop {
        if active.is_empty() {
            match rx.recv() {
                Ok(req) => active.push(SolveJob::new(req)),
                Err(_) => return, // owner dropped; shut down
            }
        }
        while let Ok(req) = rx.try_recv() {
            active.push(SolveJob::new(req));
        }

        active.retain_mut(|job| {
            match catch_unwind(AssertUnwindSafe(|| job.step(SLICE_ITERS))) {
                Ok(JobStep::More) => true,
                Ok(JobStep::Done) => false,
                Err(_) => {
                    // One bad search must not take the worker down with it.
                    error!("solver job panicked; dropping it");
                    false
                }
            }
        });
    }
}

enum JobStep {
    More,
    Done,
}

/// Stochastic hill-climb over the percent vector: perturb one coordinate,
/// keep the move only if the score strictly improves, publish on every
/// improvement. Monotonic by construction: a published map never regresses.
struct SolveJob {
    linear: Option<Vec3f>,
    rotate: Option<Vec3f>,
    model: Arc<ContributionModel>,
    cancel: Arc<AtomicBool>,
    shared: Arc<SharedMap>,
    percents: Vec<f32>,
    /// Best complementary entry per entry, for paired proposals.
    partners: Vec<usize>,
    best_score: f32,
    published: bool,
    iters: usize,
    since_improvement: usize,
    rng: StdRng,
}

impl SolveJob {
    fn new(req: SolveRequest) -> Self {
        let n = req.model.entries.len();
        let mut percents = vec![0.0; n];
        if let Some(seed) = &req.seed {
            // Warm start: carry over whatever survives in the new model.
            for hit in seed {
                if let Some(ix) = req
                    .model
                    .entries
                    .iter()
                    .position(|e| e.thruster == hit.thruster && e.sub == hit.sub)
                {
                    percents[ix] = hit.percent.clamp(0.0, 1.0);
                }
            }
        }
        let best_score = score(&req.model, &percents, req.linear, req.rotate);
        let partners = best_partners(&req.model, req.linear, req.rotate);
        Self {
            linear: req.linear,
            rotate: req.rotate,
            model: req.model,
            cancel: req.cancel,
            shared: req.shared,
            percents,
            partners,
            best_score,
            published: false,
            iters: 0,
            since_improvement: 0,
            rng: StdRng::seed_from_u64(0x7e1a_c0de ^ n as u64),
        }
    }

    fn step(&mut self, iters: usize) -> JobStep {
        if self.cancel.load(Ordering::Acquire) {
            return JobStep::Done; // cooperative, no result, no error
        }
        if self.percents.is_empty() {
            return JobStep::Done;
        }
        for _ in 0..iters {
            if self.iters >= MAX_ITERS || self.since_improvement >= STALL_LIMIT {
                self.publish_if_fresh();
                debug!(
                    iters = self.iters,
                    score = self.best_score,
                    "solver job finished"
                );
                return JobStep::Done;
            }
            self.iters += 1;

            // Half the proposals also move the entry's best complement. A
            // lone nozzle of a force-balanced couple scores worse than doing
            // nothing, so single-coordinate ascent alone would never
            // bootstrap a yaw pair; moving the couple together does.
            let i0 = self.rng.gen_range(0..self.percents.len());
            let old0 = self.percents[i0];
            let d0: f32 = self.rng.gen_range(-0.25..0.25);
            self.percents[i0] = (old0 + d0).clamp(0.0, 1.0);

            let mut second: Option<(usize, f32)> = None;
            if self.percents.len() >= 2 && self.rng.gen_bool(0.5) {
                let i1 = self.partners[i0];
                if i1 != i0 {
                    let old1 = self.percents[i1];
                    self.percents[i1] = (old1 + d0.abs()).clamp(0.0, 1.0);
                    second = Some((i1, old1));
                }
            }

            let unchanged = self.percents[i0] == old0
                && second.map_or(true, |(i1, old1)| self.percents[i1] == old1);
            if unchanged {
                self.since_improvement += 1;
                continue;
            }

            let s = score(&self.model, &self.percents, self.linear, self.rotate);
            if s > self.best_score + SCORE_EPS {
                self.best_score = s;
                self.since_improvement = 0;
                self.publish();
            } else {
                self.percents[i0] = old0;
                if let Some((i1, old1)) = second {
                    self.percents[i1] = old1;
                }
                self.since_improvement += 1;
            }
        }
        JobStep::More
    }

    fn publish(&mut self) {
        self.shared
            .publish(solution_map_from_percents(&self.model, &self.percents));
        self.published = true;
    }

    /// A warm-started job that cannot improve on its seed would otherwise
    /// never publish, leaving the group blind; push the seed itself once.
    fn publish_if_fresh(&mut self) {
        if !self.published {
            self.publish();
        }
    }
}

/// How good a candidate allocation is for the requested direction pair.
/// Wanted acceleration counts positive, anything off-axis (or any
/// acceleration at all on an unrequested half) counts against, weighted so a
/// sideways drift is never worth a small gain in the wanted direction.
fn score(
    model: &ContributionModel,
    percents: &[f32],
    linear: Option<Vec3f>,
    rotate: Option<Vec3f>,
) -> f32 {
    let mut force = Vec3f::ZERO;
    let mut torque = Vec3f::ZERO;
    for (entry, &p) in model.entries.iter().zip(percents) {
        force += entry.force * p;
        torque += entry.torque * p;
    }
    let accel = force / model.mass_props.mass;
    let ang = torque / model.mass_props.inertia_diag;

    let mut s = 0.0;
    s += match linear {
        Some(dir) => {
            let wanted = accel.dot(dir);
            let off = (accel - dir * wanted).length();
            wanted - OFF_AXIS_PENALTY * off
        }
        None => -OFF_AXIS_PENALTY * accel.length(),
    };
    s += match rotate {
        Some(axis) => {
            let wanted = ang.dot(axis);
            let off = (ang - axis * wanted).length();
            wanted - OFF_AXIS_PENALTY * off
        }
        None => -OFF_AXIS_PENALTY * ang.length(),
    };
    s
}

/// For each entry, the co-entry that scores best when the two fire together at
/// equal strength. Firing a couple is the only way some requests (a pure yaw,
/// say) ever score positive, so paired proposals follow this table instead of
/// picking a random second coordinate.
fn best_partners(
    model: &ContributionModel,
    linear: Option<Vec3f>,
    rotate: Option<Vec3f>,
) -> Vec<usize> {
    let n = model.entries.len();
    let mut scratch = vec![0.0; n];
    (0..n)
        .map(|i| {
            let mut best = (i, f32::NEG_INFINITY);
            for j in 0..n {
                if j == i {
                    continue;
                }
                scratch[i] = 0.5;
                scratch[j] = 0.5;
                let s = score(model, &scratch, linear, rotate);
                scratch[i] = 0.0;
                scratch[j] = 0.0;
                if s > best.1 {
                    best = (j, s);
                }
            }
            best.0
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use flightmodel::builtins::{mining_skiff_spec, twin_tug_spec};
    use flightmodel::MassProperties;

    fn model_for(spec: &flightmodel::ShipSpec, destroyed: &[bool]) -> Arc<ContributionModel> {
        let props = MassProperties::from_spec(spec);
        Arc::new(ContributionModel::compute(spec, destroyed, props))
    }

    fn run_to_completion(mut job: SolveJob) {
        while let JobStep::More = job.step(SLICE_ITERS) {}
    }

    fn job(
        model: Arc<ContributionModel>,
        linear: Option<Vec3f>,
        rotate: Option<Vec3f>,
        seed: Option<Vec<ThrusterHit>>,
    ) -> (SolveJob, Arc<SharedMap>) {
        let shared = Arc::new(SharedMap::default());
        let j = SolveJob::new(SolveRequest {
            linear,
            rotate,
            model,
            seed,
            cancel: Arc::new(AtomicBool::new(false)),
            shared: shared.clone(),
        });
        (j, shared)
    }

    #[test]
    fn symmetric_pair_converges_to_equal_full_fire() {
        let spec = twin_tug_spec();
        let model = model_for(&spec, &[false, false]);
        let (j, shared) = job(model, Some(Vec3f::Z), None, None);
        run_to_completion(j);

        let map = shared.load().expect("solution published");
        assert_eq!(map.used.len(), 2, "both drives used: {:?}", map.used);
        let p0 = map.used[0].percent;
        let p1 = map.used[1].percent;
        assert!((p0 - p1).abs() < 0.05, "unequal fire: {p0} vs {p1}");
        assert!(p0 > 0.9, "expected near-full fire, got {p0}");
        assert_eq!(map.rotate_accel, 0.0);
        assert!(map.linear_accel > 0.0);
    }

    #[test]
    fn yaw_request_finds_a_force_balanced_couple() {
        let spec = mining_skiff_spec();
        let n = spec.thrusters.len();
        let model = model_for(&spec, &vec![false; n]);
        let (j, shared) = job(model.clone(), None, Some(Vec3f::Y), None);
        run_to_completion(j);

        let map = shared.load().expect("solution published");
        assert!(map.rotate_accel > 0.1, "no usable yaw: {map:?}");
        // Residual linear drift should be small next to the yaw authority.
        assert!(
            map.linear_accel < map.rotate_accel,
            "drifting more than turning: {map:?}"
        );
    }

    #[test]
    fn partner_table_pairs_yaw_couples_across_the_hull() {
        let spec = mining_skiff_spec();
        let n = spec.thrusters.len();
        let model = model_for(&spec, &vec![false; n]);
        let partners = best_partners(&model, None, Some(Vec3f::Y));

        // Entry order: mains, retro, bow [right, left], stern [right, left].
        // The +Y couple is bow-right with stern-left: equal opposite forces,
        // torques adding.
        assert_eq!(partners[3], 6);
        assert_eq!(partners[6], 3);
    }

    #[test]
    fn cancelled_job_stops_without_publishing() {
        let spec = twin_tug_spec();
        let model = model_for(&spec, &[false, false]);
        let cancel = Arc::new(AtomicBool::new(true));
        let shared = Arc::new(SharedMap::default());
        let mut j = SolveJob::new(SolveRequest {
            linear: Some(Vec3f::Z),
            rotate: None,
            model,
            seed: None,
            cancel,
            shared: shared.clone(),
        });
        assert!(matches!(j.step(SLICE_ITERS), JobStep::Done));
        assert!(shared.load().is_none());
    }

    #[test]
    fn warm_seed_biases_the_starting_point_and_always_publishes() {
        let spec = twin_tug_spec();
        let model = model_for(&spec, &[false, false]);
        let seed = vec![
            ThrusterHit {
                thruster: 0,
                sub: 0,
                percent: 1.0,
            },
            ThrusterHit {
                thruster: 1,
                sub: 0,
                percent: 1.0,
            },
        ];
        let (j, shared) = job(model, Some(Vec3f::Z), None, Some(seed));
        // The seed already sits at the optimum; the job must still publish it.
        assert!((j.best_score - 12.0).abs() < 6.0, "seed not applied");
        run_to_completion(j);
        let map = shared.load().expect("seed republished");
        assert!(map.used.iter().all(|h| h.percent > 0.99));
    }

    #[test]
    fn seed_entries_for_dead_thrusters_are_dropped() {
        let spec = twin_tug_spec();
        let model = model_for(&spec, &[true, false]);
        let seed = vec![
            ThrusterHit {
                thruster: 0,
                sub: 0,
                percent: 1.0,
            },
            ThrusterHit {
                thruster: 1,
                sub: 0,
                percent: 0.5,
            },
        ];
        let (j, _shared) = job(model, Some(Vec3f::Z), None, Some(seed));
        assert_eq!(j.percents.len(), 1);
        assert!((j.percents[0] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn published_scores_never_regress() {
        let spec = mining_skiff_spec();
        let n = spec.thrusters.len();
        let model = model_for(&spec, &vec![false; n]);
        let (mut j, shared) = job(model.clone(), Some(Vec3f::Z), None, None);

        let mut last = f32::NEG_INFINITY;
        loop {
            let done = matches!(j.step(SLICE_ITERS), JobStep::Done);
            if let Some(map) = shared.load() {
                let s = score(
                    &model,
                    &dense_percents(&model, &map.used),
                    Some(Vec3f::Z),
                    None,
                );
                assert!(s >= last - 1e-3, "published score regressed: {s} < {last}");
                last = s;
            }
            if done {
                break;
            }
        }
        assert!(last > 0.0);
    }

    fn dense_percents(model: &ContributionModel, used: &[ThrusterHit]) -> Vec<f32> {
        let mut out = vec![0.0; model.entries.len()];
        for hit in used {
            if let Some(ix) = model
                .entries
                .iter()
                .position(|e| e.thruster == hit.thruster && e.sub == hit.sub)
            {
                out[ix] = hit.percent;
            }
        }
        out
    }
}
