use crate::transaction::WorkerData;
use kvload_core::RunCounts;
use metrics_util::AtomicBucket;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Outcome counters and latency recorder shared by the workers of one run.
///
/// Each run creates a fresh set. Workers only ever increment or append; the controller reads
/// once, after every worker has been joined.
pub(crate) struct TaskAtomics {
    total: Arc<AtomicU64>,
    success: Arc<AtomicU64>,
    failure: Arc<AtomicU64>,
    latency: Arc<AtomicBucket<Duration>>,
}

impl TaskAtomics {
    pub fn new() -> Self {
        Self {
            total: Arc::new(AtomicU64::new(0)),
            success: Arc::new(AtomicU64::new(0)),
            failure: Arc::new(AtomicU64::new(0)),
            latency: Arc::new(AtomicBucket::new()),
        }
    }

    pub fn clone_to_worker_data(&self, measure_latency: bool) -> WorkerData {
        WorkerData {
            total: self.total.clone(),
            success: self.success.clone(),
            failure: self.failure.clone(),
            latency: self.latency.clone(),
            measure_latency,
        }
    }

    pub fn collect(&self) -> (RunCounts, Vec<Duration>) {
        let counts = RunCounts {
            total: self.total.load(Ordering::Relaxed),
            success: self.success.load(Ordering::Relaxed),
            failure: self.failure.load(Ordering::Relaxed),
        };
        (counts, self.latency.data())
    }
}
