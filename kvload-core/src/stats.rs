#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
#[allow(unused_imports)]
#[cfg(feature = "serde")]
use serde_with::{serde_as, DurationSecondsWithFrac};
use std::fmt;
use std::time::Duration;

/// Operation tallies of one run, read once all workers have stopped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunCounts {
    pub total: u64,
    pub success: u64,
    pub failure: u64,
}

/// Latency summary of one run. All zero when latency was not measured or no read finished.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", cfg_eval::cfg_eval, serde_as)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LatencyStats {
    #[cfg_attr(feature = "serde", serde_as(as = "DurationSecondsWithFrac<f64>"))]
    pub average: Duration,
    #[cfg_attr(feature = "serde", serde_as(as = "DurationSecondsWithFrac<f64>"))]
    pub p50: Duration,
    #[cfg_attr(feature = "serde", serde_as(as = "DurationSecondsWithFrac<f64>"))]
    pub p90: Duration,
    #[cfg_attr(feature = "serde", serde_as(as = "DurationSecondsWithFrac<f64>"))]
    pub p95: Duration,
    #[cfg_attr(feature = "serde", serde_as(as = "DurationSecondsWithFrac<f64>"))]
    pub p99: Duration,
    #[cfg_attr(feature = "serde", serde_as(as = "DurationSecondsWithFrac<f64>"))]
    pub max: Duration,
}

impl LatencyStats {
    /// Summarise raw samples. Percentiles use the nearest-rank method.
    pub fn from_samples(mut samples: Vec<Duration>) -> Self {
        if samples.is_empty() {
            return Self::default();
        }

        samples.sort_unstable();

        let sum: u128 = samples.iter().map(Duration::as_nanos).sum();
        let average = (sum / samples.len() as u128) as u64;

        Self {
            average: Duration::from_nanos(average),
            p50: nearest_rank(&samples, 50.),
            p90: nearest_rank(&samples, 90.),
            p95: nearest_rank(&samples, 95.),
            p99: nearest_rank(&samples, 99.),
            max: samples[samples.len() - 1],
        }
    }
}

/// Nearest-rank percentile of an ascending slice: the sample at index
/// `ceil(p / 100 * n) - 1`, clamped to the slice. Zero for an empty slice.
pub fn nearest_rank(sorted: &[Duration], percentile: f64) -> Duration {
    if sorted.is_empty() {
        return Duration::ZERO;
    }

    // NOTE: Multiply before dividing so whole percentiles on small sets stay exact.
    let rank = (percentile * sorted.len() as f64 / 100.).ceil() as i64;
    let index = (rank - 1).clamp(0, sorted.len() as i64 - 1) as usize;
    sorted[index]
}

/// Milliseconds with sub-millisecond precision.
pub fn millis(duration: Duration) -> f64 {
    duration.as_nanos() as f64 / 1_000_000.
}

/// Summary of one read test run.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", cfg_eval::cfg_eval, serde_as)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RunStatistics {
    pub workers: usize,
    pub total_operations: u64,
    pub successful_operations: u64,
    pub failed_operations: u64,
    #[cfg_attr(feature = "serde", serde_as(as = "DurationSecondsWithFrac<f64>"))]
    pub elapsed: Duration,
    /// Operations per second over the whole run.
    pub throughput: f64,
    /// Fraction of operations that hit, in `[0, 1]`.
    pub success_rate: f64,
    pub latency: LatencyStats,
}

impl RunStatistics {
    /// Reduce the raw output of a run. `latencies` is `None` when latency was not measured.
    pub fn reduce(
        workers: usize,
        counts: RunCounts,
        elapsed: Duration,
        latencies: Option<Vec<Duration>>,
    ) -> Self {
        let secs = elapsed.as_secs_f64();
        let throughput = if secs > 0. {
            counts.total as f64 / secs
        } else {
            0.
        };

        let success_rate = if counts.total > 0 {
            counts.success as f64 / counts.total as f64
        } else {
            0.
        };

        Self {
            workers,
            total_operations: counts.total,
            successful_operations: counts.success,
            failed_operations: counts.failure,
            elapsed,
            throughput,
            success_rate,
            latency: latencies.map(LatencyStats::from_samples).unwrap_or_default(),
        }
    }
}

impl fmt::Display for RunStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Workers={}, Ops={}, TPS={:.2}, SuccessRate={:.2}%, avg={:.2}ms, p50={:.2}ms, p90={:.2}ms, p99={:.2}ms, max={:.2}ms",
            self.workers,
            self.total_operations,
            self.throughput,
            self.success_rate * 100.,
            millis(self.latency.average),
            millis(self.latency.p50),
            millis(self.latency.p90),
            millis(self.latency.p99),
            millis(self.latency.max),
        )
    }
}
