//! A single read test run at a fixed worker count.
mod task_atomics;
mod worker;

use crate::error::RunError;
use crate::key_selector::KeySelector;
use crate::store::KvStore;
use kvload_core::{millis, RunConfig, RunStatistics};
use std::future::{self, Future};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use task_atomics::TaskAtomics;
use tokio::task::JoinSet;
use tokio::time::{timeout, timeout_at, Instant};
#[allow(unused_imports)]
use tracing::{debug, error, info, instrument, trace, warn};
use worker::{StopConditions, Worker};

/// Read test against a shared store.
///
/// # Example
/// ```no_run
/// use kvload::prelude::*;
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// # async fn example<S: KvStore + Send + Sync + 'static>(store: Arc<S>) -> Result<(), RunError> {
/// let config = RunConfig::new()
///     .workers(10)
///     .warmup_operations(1_000)
///     .duration(Duration::from_secs(10))
///     .key_range(0, 4_999_999);
///
/// let stats = ReadTest::new(store, config).run().await?;
/// println!("{stats}");
/// # Ok(())
/// # }
/// ```
pub struct ReadTest<S> {
    store: Arc<S>,
    config: RunConfig,
}

impl<S> ReadTest<S>
where
    S: KvStore + Send + Sync + 'static,
{
    pub fn new(store: Arc<S>, config: RunConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Run to completion. Rejects an invalid config before any worker starts.
    pub async fn run(&self) -> Result<RunStatistics, RunError> {
        self.run_until(future::pending()).await
    }

    /// Run until completion or until `shutdown` resolves, whichever comes first.
    ///
    /// On shutdown every worker is aborted and [`RunError::Interrupted`] is returned; no
    /// partial result is produced for the interrupted run.
    pub async fn run_until<F>(&self, shutdown: F) -> Result<RunStatistics, RunError>
    where
        F: Future<Output = ()>,
    {
        self.config.validate()?;

        tokio::select! {
            biased;
            _ = shutdown => {
                warn!("Read test interrupted; aborting workers.");
                Err(RunError::Interrupted { completed: vec![] })
            }
            res = run_read_test(self.store.clone(), &self.config) => res,
        }
    }
}

#[instrument(name = "read_test", skip_all, fields(workers = config.workers, distribution = %config.distribution))]
pub(crate) async fn run_read_test<S>(
    store: Arc<S>,
    config: &RunConfig,
) -> Result<RunStatistics, RunError>
where
    S: KvStore + Send + Sync + 'static,
{
    info!("Running read test with config {:?}", config);
    info!("Key range: {} to {}", config.min_key, config.max_key);

    let selector = KeySelector::for_run(config, &mut rand::thread_rng());
    if let Some(hot) = selector.hot_spot() {
        info!("Hot spot range: {} to {}", hot.start, hot.end);
    }

    let atomics = TaskAtomics::new();
    let stop = Arc::new(AtomicBool::new(false));

    let start = Instant::now();
    let deadline = config.duration.map(|duration| start + duration);
    let conditions = StopConditions {
        warmup_operations: config.warmup_operations,
        operations: config.operations_per_worker,
        deadline,
    };

    // NOTE: Dropping the set aborts every worker, so an early return cannot leak tasks.
    let mut tasks = JoinSet::new();
    for id in 0..config.workers {
        let worker = Worker {
            id,
            store: store.clone(),
            selector,
            data: atomics.clone_to_worker_data(config.measure_latency),
            stop: stop.clone(),
            conditions,
        };
        tasks.spawn(worker.run());
    }

    match deadline {
        None => join_workers(&mut tasks).await?,
        Some(deadline) => match timeout_at(deadline, join_workers(&mut tasks)).await {
            Ok(res) => res?,
            Err(_) => {
                debug!("Deadline reached with {} worker(s) running.", tasks.len());
                stop.store(true, Ordering::Relaxed);

                match timeout(config.grace_period, join_workers(&mut tasks)).await {
                    Ok(res) => res?,
                    Err(_) => {
                        warn!(
                            "{} worker(s) still running {} after the deadline; aborting.",
                            tasks.len(),
                            humantime::format_duration(config.grace_period)
                        );
                        tasks.abort_all();
                        join_workers(&mut tasks).await?;
                    }
                }
            }
        },
    }

    // Every worker is joined; nothing mutates the atomics past this point.
    let elapsed = start.elapsed();
    let (counts, latencies) = atomics.collect();
    let stats = RunStatistics::reduce(
        config.workers,
        counts,
        elapsed,
        config.measure_latency.then_some(latencies),
    );

    log_summary(&stats, config.measure_latency);
    Ok(stats)
}

/// Wait for every task in the set. Aborted workers are expected; a panic is not.
async fn join_workers(tasks: &mut JoinSet<u64>) -> Result<(), RunError> {
    while let Some(res) = tasks.join_next().await {
        match res {
            Ok(_) => {}
            Err(err) if err.is_cancelled() => {}
            Err(err) => {
                error!("Worker failed: {err}");
                return Err(RunError::WorkerPanicked(err.to_string()));
            }
        }
    }
    Ok(())
}

fn log_summary(stats: &RunStatistics, measure_latency: bool) {
    info!(
        "Read test completed in {}",
        humantime::format_duration(stats.elapsed)
    );
    info!("Worker count: {}", stats.workers);
    info!("Total operations: {}", stats.total_operations);
    info!("Successful operations: {}", stats.successful_operations);
    info!("Failed operations: {}", stats.failed_operations);
    info!("Throughput: {:.2} operations/second", stats.throughput);
    info!("Success rate: {:.2}%", stats.success_rate * 100.);

    if measure_latency {
        info!("Latency statistics:");
        info!("  Average: {:.3} ms", millis(stats.latency.average));
        info!("  50th percentile: {:.3} ms", millis(stats.latency.p50));
        info!("  90th percentile: {:.3} ms", millis(stats.latency.p90));
        info!("  95th percentile: {:.3} ms", millis(stats.latency.p95));
        info!("  99th percentile: {:.3} ms", millis(stats.latency.p99));
        info!("  Maximum: {:.3} ms", millis(stats.latency.max));
    }
}
