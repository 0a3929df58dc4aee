use std::collections::HashMap;
use std::sync::OnceLock;
use tracing::{error, Level};
use tracing_subscriber::FmtSubscriber;

#[allow(unused)]
pub fn init() {
    static ONCE_LOCK: OnceLock<()> = OnceLock::new();

    ONCE_LOCK.get_or_init(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            default_panic(info);
            error!("Panic occurred: {info:?}");
        }));

        FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_env_filter("kvload=debug,mock_store=info")
            .with_test_writer()
            .init();
    });
}

/// Largest number of reads landing in any window of `len` consecutive keys in `[min, max]`.
#[allow(unused)]
pub fn densest_window(tallies: &HashMap<u64, u64>, min: u64, max: u64, len: u64) -> u64 {
    let counts: Vec<u64> = (min..=max)
        .map(|key| tallies.get(&key).copied().unwrap_or(0))
        .collect();

    counts
        .windows(len as usize)
        .map(|window| window.iter().sum())
        .max()
        .unwrap_or(0)
}
