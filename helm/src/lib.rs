//! Thrust-key mapping and control allocation for a ship with an arbitrary,
//! asymmetric thruster layout.
//!
//! The helm owns three pieces: a key-binding table mapping input keys to
//! desired accelerations, an asynchronous solver that discovers firing-percent
//! combinations approximating each desired acceleration, and a per-tick
//! allocator that turns the currently-held keys into live percent assignments.
//! The allocator never blocks on the solver; it reads whatever map the solver
//! has published so far, and a key whose solve has not converged yet simply
//! contributes nothing that tick.

mod keys;
pub use keys::Key;

mod request;
pub use request::{
    default_bindings, KeyThrustRequest, RequestIdentity, PRECISION_LINEAR, PRECISION_ROTATE,
};

mod solution;
pub use solution::{SharedMap, ThrusterSolution};

mod table;
pub use table::{SolutionTable, SolveJobSpec};

mod solver;
pub use solver::{SolveRequest, SolverWorker};

mod error;
pub use error::HelmError;

mod helm;
pub use helm::{Helm, ImpulseDirective};
