use std::time::Duration;

/// Share of the key range that forms the hot spot of a hot-spot run.
pub const HOT_SPOT_FRACTION: f64 = 0.2;

/// Probability that a hot-spot draw lands inside the hot spot.
pub const HOT_SPOT_PROBABILITY: f64 = 0.8;

/// Smallest key range a hot-spot run accepts: at least one hot key and one cold key.
pub const MIN_HOT_SPOT_KEYS: u128 = 5;

/// Time workers get to observe the stop flag before they are aborted.
pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_millis(250);

/// Pause between two steps of a ramp sweep.
pub const DEFAULT_SETTLE_PAUSE: Duration = Duration::from_secs(2);
