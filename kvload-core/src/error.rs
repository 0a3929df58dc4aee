use thiserror::Error;

/// A configuration that must be rejected before any worker starts.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Worker count must be at least 1.")]
    NoWorkers,

    #[error("Key range is inverted: min key {min} is greater than max key {max}.")]
    InvertedKeyRange { min: u64, max: u64 },

    #[error("Run is unbounded: set a duration, an operation cap per worker, or both.")]
    Unbounded,

    #[error("Run duration must be greater than zero; leave it unset for no deadline.")]
    ZeroDuration,

    #[error("Key range of {size} keys is too small for a hot-spot run (need at least {min}).")]
    KeyRangeTooSmallForHotSpot { size: u128, min: u128 },

    #[error("Ramp max worker count must be at least 1.")]
    RampNoWorkers,

    #[error("Ramp step must be at least 1.")]
    RampZeroStep,
}
