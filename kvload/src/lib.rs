#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod error;
pub mod export;
pub mod key_selector;
pub mod ramp;
pub mod store;
pub mod test_run;
mod transaction;

pub use error::{ExportError, RunError};
pub use key_selector::{HotSpotRange, KeySelector};
pub use kvload_core as core;
pub use ramp::{RampSeries, RampTest};
pub use store::{KvStore, LocalKvStore, ReadOutcome};
pub use test_run::ReadTest;

pub mod prelude {
    pub use crate::error::{ExportError, RunError};
    pub use crate::ramp::{RampSeries, RampTest};
    pub use crate::store::{KvStore, ReadOutcome};
    pub use crate::test_run::ReadTest;

    pub use kvload_core::{KeyDistribution, RampConfig, RunConfig, RunStatistics};
}
