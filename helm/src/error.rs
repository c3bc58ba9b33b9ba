use thiserror::Error;

/// Fatal helm failures. Transient conditions (a solve that has not published
/// yet, a cancelled generation, a zero-torque map) are not errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HelmError {
    /// A published map names a sub-thruster the ship does not have. The table
    /// is rebuilt whenever geometry changes, so this can only mean the cache
    /// and the spec have diverged.
    #[error("solution map references unknown sub-thruster ({thruster}, {sub})")]
    ContributionDesync { thruster: usize, sub: usize },
}
