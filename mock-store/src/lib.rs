//! In-process stand-in for a key-value store, used to exercise kvload without a cluster.
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use kvload::KvStore;
use rand::Rng;
use rand_distr::{Distribution, SkewNormal};
use std::collections::HashMap;
use std::num::NonZeroU32;
use std::ops::RangeInclusive;
use std::sync::Mutex;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

pub mod prelude {
    pub use super::{LatencyProfile, MockError, MockStore, Record};
}

/// Value returned for populated keys.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    pub key: u64,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MockError {
    #[error("Injected failure reading key {0}")]
    Injected(u64),

    #[error("Store overloaded")]
    Overloaded,
}

/// Per-read delay, drawn from a right-skewed normal distribution.
#[derive(Clone, Copy, Debug)]
pub struct LatencyProfile {
    pub mean: Duration,
    pub std: Duration,
}

pub struct MockStore {
    populated: RangeInclusive<u64>,
    latency: Option<SkewNormal<f64>>,
    error_rate: f64,
    limiter: Option<DefaultDirectRateLimiter>,
    hang: bool,
    tallies: Mutex<HashMap<u64, u64>>,
}

impl MockStore {
    /// A store holding a record for every key in `populated`; every other key misses.
    pub fn new(populated: RangeInclusive<u64>) -> Self {
        Self {
            populated,
            latency: None,
            error_rate: 0.,
            limiter: None,
            hang: false,
            tallies: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_latency(mut self, profile: LatencyProfile) -> Self {
        // NOTE: Shape of 20 keeps the tail to the right, like a real network hop.
        self.latency = SkewNormal::new(
            profile.mean.as_secs_f64(),
            profile.std.as_secs_f64(),
            20.,
        )
        .ok();
        self
    }

    /// Fail each read with probability `error_rate`.
    pub fn with_error_rate(mut self, error_rate: f64) -> Self {
        self.error_rate = error_rate.clamp(0., 1.);
        self
    }

    /// Fail reads beyond `max_tps` per second, like an overloaded node.
    pub fn with_max_tps(mut self, max_tps: NonZeroU32) -> Self {
        self.limiter = Some(RateLimiter::direct(Quota::per_second(max_tps)));
        self
    }

    /// Never answer a read.
    pub fn hanging(mut self) -> Self {
        self.hang = true;
        self
    }

    /// Reads per key so far, warmup included.
    pub fn tallies(&self) -> HashMap<u64, u64> {
        self.tallies
            .lock()
            .map(|tallies| tallies.clone())
            .unwrap_or_default()
    }

    pub fn total_reads(&self) -> u64 {
        self.tallies().values().sum()
    }

    fn tally(&self, key: u64) {
        if let Ok(mut tallies) = self.tallies.lock() {
            *tallies.entry(key).or_insert(0) += 1;
        }
    }

    fn sample_latency(&self) -> Option<Duration> {
        let dist = self.latency.as_ref()?;
        let secs: f64 = dist.sample(&mut rand::thread_rng()).max(0.);
        Some(Duration::from_secs_f64(secs))
    }

    fn should_fail(&self) -> bool {
        self.error_rate > 0. && rand::thread_rng().gen_bool(self.error_rate)
    }
}

impl KvStore for MockStore {
    type Value = Record;
    type Error = MockError;

    async fn read(&self, key: u64) -> Result<Option<Record>, MockError> {
        self.tally(key);

        if self.hang {
            std::future::pending::<()>().await;
        }

        if let Some(delay) = self.sample_latency() {
            tokio::time::sleep(delay).await;
        }

        if let Some(limiter) = &self.limiter {
            if limiter.check().is_err() {
                debug!("MOCK STORE ___ OVERLOADED");
                return Err(MockError::Overloaded);
            }
        }

        if self.should_fail() {
            return Err(MockError::Injected(key));
        }

        Ok(self.populated.contains(&key).then_some(Record { key }))
    }
}
