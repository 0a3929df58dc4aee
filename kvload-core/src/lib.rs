#![cfg_attr(docsrs, feature(doc_cfg))]
//! Core types for kvload: run and ramp configuration, validation errors and the pure
//! reduction of raw counters and latency samples into [`RunStatistics`].
mod config;
mod constants;
mod error;
mod stats;

pub use config::*;
pub use constants::*;
pub use error::*;
pub use stats::*;
