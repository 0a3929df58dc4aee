use kvload_core::{KeyDistribution, RunConfig, HOT_SPOT_PROBABILITY};
use rand::Rng;

/// The inclusive slice of the key range that receives most reads during a hot-spot run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HotSpotRange {
    pub start: u64,
    pub end: u64,
}

impl HotSpotRange {
    /// Place a hot spot of `config.hot_spot_len()` keys at a random offset in the key range.
    ///
    /// Expects a validated config.
    pub fn choose<R: Rng + ?Sized>(config: &RunConfig, rng: &mut R) -> Self {
        let len = config.hot_spot_len().max(1);
        let slack = config.key_count() - len;
        let offset = rng.gen_range(0..=slack) as u64;
        let start = config.min_key + offset;

        Self {
            start,
            end: start + (len - 1) as u64,
        }
    }

    pub fn contains(&self, key: u64) -> bool {
        key >= self.start && key <= self.end
    }

    pub fn key_count(&self) -> u128 {
        u128::from(self.end - self.start) + 1
    }
}

/// Maps random draws to keys for one run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeySelector {
    Uniform { min: u64, max: u64 },
    HotSpot { min: u64, max: u64, hot: HotSpotRange },
}

impl KeySelector {
    /// Build the selector for a run. A hot-spot run fixes its hot range here, once.
    pub fn for_run<R: Rng + ?Sized>(config: &RunConfig, rng: &mut R) -> Self {
        match config.distribution {
            KeyDistribution::Uniform => KeySelector::Uniform {
                min: config.min_key,
                max: config.max_key,
            },
            KeyDistribution::HotSpot => KeySelector::HotSpot {
                min: config.min_key,
                max: config.max_key,
                hot: HotSpotRange::choose(config, rng),
            },
        }
    }

    pub fn hot_spot(&self) -> Option<HotSpotRange> {
        match self {
            KeySelector::Uniform { .. } => None,
            KeySelector::HotSpot { hot, .. } => Some(*hot),
        }
    }

    pub fn next_key<R: Rng + ?Sized>(&self, rng: &mut R) -> u64 {
        match *self {
            KeySelector::Uniform { min, max } => rng.gen_range(min..=max),
            KeySelector::HotSpot { min, max, hot } => {
                if rng.gen_bool(HOT_SPOT_PROBABILITY) {
                    rng.gen_range(hot.start..=hot.end)
                } else {
                    // The cold set is never empty for a validated config.
                    loop {
                        let key = rng.gen_range(min..=max);
                        if !hot.contains(key) {
                            break key;
                        }
                    }
                }
            }
        }
    }
}
