use crate::{
    ConfigError, DEFAULT_GRACE_PERIOD, DEFAULT_SETTLE_PAUSE, HOT_SPOT_FRACTION, MIN_HOT_SPOT_KEYS,
};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
#[allow(unused_imports)]
#[cfg(feature = "serde")]
use serde_with::{serde_as, DurationMilliSeconds, DurationSeconds};
use std::fmt;
use std::num::NonZeroU64;
use std::time::Duration;

/// How a worker picks the next key to read.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum KeyDistribution {
    /// Every key in range is equally likely.
    #[default]
    Uniform,
    /// 80% of reads hit a fixed 20% slice of the range, chosen once per run.
    HotSpot,
}

impl fmt::Display for KeyDistribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyDistribution::Uniform => write!(f, "uniform"),
            KeyDistribution::HotSpot => write!(f, "hot-spot"),
        }
    }
}

/// Configuration for a single read test run.
///
/// Immutable for the duration of a run. Unbounded limits are `None`; at least one of
/// `operations_per_worker` and `duration` must be set. When both are set the run stops at
/// whichever fires first.
///
/// # Example
/// ```
/// use kvload_core::{KeyDistribution, RunConfig};
/// use std::time::Duration;
///
/// let config = RunConfig::new()
///     .workers(10)
///     .warmup_operations(1_000)
///     .duration(Duration::from_secs(10))
///     .key_range(0, 4_999_999)
///     .distribution(KeyDistribution::HotSpot);
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", cfg_eval::cfg_eval, serde_as)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RunConfig {
    pub workers: usize,
    pub operations_per_worker: Option<NonZeroU64>,
    pub warmup_operations: u64,
    #[cfg_attr(feature = "serde", serde_as(as = "Option<DurationSeconds>"))]
    pub duration: Option<Duration>,
    pub min_key: u64,
    pub max_key: u64,
    pub distribution: KeyDistribution,
    pub measure_latency: bool,
    #[cfg_attr(feature = "serde", serde_as(as = "DurationMilliSeconds"))]
    pub grace_period: Duration,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl RunConfig {
    pub fn new() -> Self {
        Self {
            workers: 1,
            operations_per_worker: None,
            warmup_operations: 0,
            duration: None,
            min_key: 0,
            max_key: 0,
            distribution: KeyDistribution::Uniform,
            measure_latency: true,
            grace_period: DEFAULT_GRACE_PERIOD,
        }
    }

    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Cap on measured reads per worker. `0` means no cap.
    pub fn operations_per_worker(mut self, operations: u64) -> Self {
        self.operations_per_worker = NonZeroU64::new(operations);
        self
    }

    pub fn warmup_operations(mut self, operations: u64) -> Self {
        self.warmup_operations = operations;
        self
    }

    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Inclusive range of keys to read from.
    pub fn key_range(mut self, min_key: u64, max_key: u64) -> Self {
        self.min_key = min_key;
        self.max_key = max_key;
        self
    }

    pub fn distribution(mut self, distribution: KeyDistribution) -> Self {
        self.distribution = distribution;
        self
    }

    pub fn measure_latency(mut self, measure_latency: bool) -> Self {
        self.measure_latency = measure_latency;
        self
    }

    pub fn grace_period(mut self, grace_period: Duration) -> Self {
        self.grace_period = grace_period;
        self
    }

    /// Number of keys in the inclusive key range. Only meaningful for a valid range.
    pub fn key_count(&self) -> u128 {
        u128::from(self.max_key.saturating_sub(self.min_key)) + 1
    }

    /// Number of keys in the hot spot of a hot-spot run, `floor(0.2 * key_count)`.
    pub fn hot_spot_len(&self) -> u128 {
        (self.key_count() as f64 * HOT_SPOT_FRACTION).floor() as u128
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == 0 {
            return Err(ConfigError::NoWorkers);
        }

        if self.min_key > self.max_key {
            return Err(ConfigError::InvertedKeyRange {
                min: self.min_key,
                max: self.max_key,
            });
        }

        match (self.duration, self.operations_per_worker) {
            (Some(duration), _) if duration.is_zero() => return Err(ConfigError::ZeroDuration),
            (None, None) => return Err(ConfigError::Unbounded),
            _ => {}
        }

        if self.distribution == KeyDistribution::HotSpot && self.key_count() < MIN_HOT_SPOT_KEYS
        {
            return Err(ConfigError::KeyRangeTooSmallForHotSpot {
                size: self.key_count(),
                min: MIN_HOT_SPOT_KEYS,
            });
        }

        Ok(())
    }
}

/// Configuration for a ramp-up sweep: runs at `1, 1 + step, 1 + 2 * step, ...` workers up to
/// and including `max_workers`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", cfg_eval::cfg_eval, serde_as)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RampConfig {
    pub max_workers: usize,
    pub step: usize,
    #[cfg_attr(feature = "serde", serde_as(as = "DurationMilliSeconds"))]
    pub settle_pause: Duration,
}

impl RampConfig {
    pub fn new(max_workers: usize, step: usize) -> Self {
        Self {
            max_workers,
            step,
            settle_pause: DEFAULT_SETTLE_PAUSE,
        }
    }

    pub fn settle_pause(mut self, settle_pause: Duration) -> Self {
        self.settle_pause = settle_pause;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_workers == 0 {
            return Err(ConfigError::RampNoWorkers);
        }
        if self.step == 0 {
            return Err(ConfigError::RampZeroStep);
        }
        Ok(())
    }

    /// Worker counts issued by the sweep, in order.
    pub fn steps(&self) -> impl Iterator<Item = usize> {
        ramp_steps(self.max_workers, self.step)
    }
}

/// Worker counts `1, 1 + step, ...` that do not exceed `max_workers`.
pub fn ramp_steps(max_workers: usize, step: usize) -> impl Iterator<Item = usize> {
    (1..=max_workers).step_by(step.max(1))
}
