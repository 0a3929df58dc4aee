use kvload_core::{ConfigError, RunStatistics};
use thiserror::Error;

/// A run or sweep that could not produce its result.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("A worker panicked: {0}")]
    WorkerPanicked(String),

    /// An external shutdown signal fired. `completed` holds every result finished before it;
    /// the interrupted run contributes nothing.
    #[error("Interrupted after {} completed run(s).", completed.len())]
    Interrupted { completed: Vec<RunStatistics> },
}

/// Writing a result series failed. The in-memory series is untouched.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to write export: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode export: {0}")]
    Csv(#[from] csv::Error),
}
