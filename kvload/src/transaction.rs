use crate::store::{KvStore, ReadOutcome};
use metrics_util::AtomicBucket;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use std::time::{Duration, Instant};
use tracing::trace;

#[cfg(feature = "metrics")]
pub(crate) const SUCCESS_COUNTER: &str = "kvload_read_success";
#[cfg(feature = "metrics")]
pub(crate) const FAILURE_COUNTER: &str = "kvload_read_failure";
#[cfg(feature = "metrics")]
pub(crate) const LATENCY_HISTOGRAM: &str = "kvload_read_latency";

/// A worker's handle on the run-scoped atomics.
#[derive(Clone)]
pub(crate) struct WorkerData {
    pub total: Arc<AtomicU64>,
    pub success: Arc<AtomicU64>,
    pub failure: Arc<AtomicU64>,
    pub latency: Arc<AtomicBucket<Duration>>,
    pub measure_latency: bool,
}

impl WorkerData {
    pub fn record(&self, outcome: ReadOutcome, elapsed: Option<Duration>) {
        self.total.fetch_add(1, Ordering::Relaxed);

        if outcome.is_success() {
            self.success.fetch_add(1, Ordering::Relaxed);
            #[cfg(feature = "metrics")]
            metrics::counter!(SUCCESS_COUNTER).increment(1);
        } else {
            self.failure.fetch_add(1, Ordering::Relaxed);
            #[cfg(feature = "metrics")]
            metrics::counter!(FAILURE_COUNTER).increment(1);
        }

        if let Some(elapsed) = elapsed {
            self.latency.push(elapsed);
            #[cfg(feature = "metrics")]
            metrics::histogram!(LATENCY_HISTOGRAM).record(elapsed.as_nanos() as f64);
        }
    }
}

/// Issue one measured read and record its outcome. Errors never escape.
pub(crate) async fn read_hook<S: KvStore>(store: &S, key: u64, data: &WorkerData) -> ReadOutcome {
    // NOTE: Nothing but the read may sit between the two timestamps.
    let start = data.measure_latency.then(Instant::now);
    let res = store.read(key).await;
    let elapsed = start.map(|start| start.elapsed());

    let outcome = match res {
        Ok(Some(_)) => ReadOutcome::Hit,
        Ok(None) => ReadOutcome::Miss,
        Err(err) => {
            trace!("Read of key {key} failed: {err}");
            ReadOutcome::Error
        }
    };

    data.record(outcome, elapsed);
    outcome
}

/// Issue one unmeasured read, discarding the outcome.
pub(crate) async fn warmup_hook<S: KvStore>(store: &S, key: u64) {
    if let Err(err) = store.read(key).await {
        trace!("Warmup read of key {key} failed: {err}");
    }
}
