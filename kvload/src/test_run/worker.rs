use crate::key_selector::KeySelector;
use crate::store::KvStore;
use crate::transaction::{read_hook, warmup_hook, WorkerData};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::num::NonZeroU64;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use tokio::time::Instant;
#[allow(unused)]
use tracing::{debug, trace};

/// Reads between forced yields, so a store that never awaits cannot starve the runtime.
const YIELD_INTERVAL: u64 = 64;

/// When a worker must stop issuing reads.
#[derive(Clone, Copy, Debug)]
pub(crate) struct StopConditions {
    pub warmup_operations: u64,
    pub operations: Option<NonZeroU64>,
    pub deadline: Option<Instant>,
}

pub(crate) struct Worker<S> {
    pub id: usize,
    pub store: Arc<S>,
    pub selector: KeySelector,
    pub data: WorkerData,
    pub stop: Arc<AtomicBool>,
    pub conditions: StopConditions,
}

impl<S> Worker<S>
where
    S: KvStore + Send + Sync + 'static,
{
    /// Warm up, then read until the operation cap, the deadline or the stop flag.
    pub async fn run(self) -> u64 {
        let mut rng = SmallRng::from_entropy();

        for _ in 0..self.conditions.warmup_operations {
            if self.should_stop() {
                trace!("Worker {} stopped during warmup.", self.id);
                return 0;
            }
            let key = self.selector.next_key(&mut rng);
            warmup_hook(self.store.as_ref(), key).await;
        }

        let mut performed = 0u64;
        loop {
            if let Some(cap) = self.conditions.operations {
                if performed >= cap.get() {
                    break;
                }
            }

            if self.should_stop() {
                break;
            }

            let key = self.selector.next_key(&mut rng);
            read_hook(self.store.as_ref(), key, &self.data).await;
            performed += 1;

            if performed % YIELD_INTERVAL == 0 {
                tokio::task::yield_now().await;
            }
        }

        trace!("Worker {} finished after {performed} reads.", self.id);
        performed
    }

    fn should_stop(&self) -> bool {
        if self.stop.load(Ordering::Relaxed) {
            return true;
        }

        matches!(self.conditions.deadline, Some(deadline) if Instant::now() >= deadline)
    }
}
