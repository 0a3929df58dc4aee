//! Ramp-up sweeps: the same read test repeated at increasing worker counts.
use crate::error::RunError;
use crate::store::KvStore;
use crate::test_run::run_read_test;
use kvload_core::{millis, RampConfig, RunConfig, RunStatistics};
use std::future::{self, Future};
use std::sync::Arc;
#[allow(unused_imports)]
use tracing::{debug, error, info, instrument, warn};

/// Ordered results of a sweep, one per worker count.
pub type RampSeries = Vec<RunStatistics>;

/// Ramp-up sweep against a shared store.
///
/// Every field of the base config except the worker count is held fixed. Runs are separated by
/// the configured settle pause.
///
/// # Example
/// ```no_run
/// use kvload::prelude::*;
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// # async fn example<S: KvStore + Send + Sync + 'static>(store: Arc<S>) -> Result<(), Box<dyn std::error::Error>> {
/// let base = RunConfig::new()
///     .warmup_operations(500)
///     .duration(Duration::from_secs(5))
///     .key_range(0, 4_999_999);
///
/// let series = RampTest::new(store, base, RampConfig::new(50, 5)).run().await?;
/// kvload::export::export_csv_file("rampup_results.csv", &series)?;
/// # Ok(())
/// # }
/// ```
pub struct RampTest<S> {
    store: Arc<S>,
    base: RunConfig,
    ramp: RampConfig,
}

impl<S> RampTest<S>
where
    S: KvStore + Send + Sync + 'static,
{
    pub fn new(store: Arc<S>, base: RunConfig, ramp: RampConfig) -> Self {
        Self { store, base, ramp }
    }

    pub async fn run(&self) -> Result<RampSeries, RunError> {
        self.run_until(future::pending()).await
    }

    /// Run the sweep until it completes or `shutdown` resolves.
    ///
    /// On shutdown no further step is issued, the step in flight is aborted and
    /// [`RunError::Interrupted`] carries every result completed so far.
    #[instrument(name = "ramp", skip_all, fields(max_workers = self.ramp.max_workers, step = self.ramp.step))]
    pub async fn run_until<F>(&self, shutdown: F) -> Result<RampSeries, RunError>
    where
        F: Future<Output = ()>,
    {
        self.ramp.validate()?;
        // Every step shares the base config, so one check covers the sweep.
        self.base.clone().workers(1).validate()?;

        info!(
            "Starting ramp-up test from 1 to {} workers (step: {})",
            self.ramp.max_workers, self.ramp.step
        );

        tokio::pin!(shutdown);
        let steps: Vec<usize> = self.ramp.steps().collect();
        let mut series = RampSeries::with_capacity(steps.len());

        for (i, workers) in steps.iter().copied().enumerate() {
            info!("Testing with {workers} workers");
            let config = self.base.clone().workers(workers);

            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    warn!("Ramp-up test interrupted at {workers} workers.");
                    return Err(RunError::Interrupted { completed: series });
                }
                res = run_read_test(self.store.clone(), &config) => series.push(res?),
            }

            if i + 1 < steps.len() {
                debug!(
                    "Settling for {}",
                    humantime::format_duration(self.ramp.settle_pause)
                );
                tokio::select! {
                    biased;
                    _ = &mut shutdown => {
                        warn!("Ramp-up test interrupted while settling.");
                        return Err(RunError::Interrupted { completed: series });
                    }
                    _ = tokio::time::sleep(self.ramp.settle_pause) => {}
                }
            }
        }

        log_summary(&series);
        Ok(series)
    }
}

fn log_summary(series: &[RunStatistics]) {
    info!("Ramp-up test summary:");
    info!("Workers | Throughput (ops/s) | Avg Latency (ms) | Success Rate (%)");
    info!("--------|--------------------|------------------|-----------------");
    for stats in series {
        info!(
            "{:<8}| {:<19.2}| {:<17.2}| {:.2}%",
            stats.workers,
            stats.throughput,
            millis(stats.latency.average),
            stats.success_rate * 100.
        );
    }
}
