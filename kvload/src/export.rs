//! Flat CSV export of a result series.
use crate::error::ExportError;
use kvload_core::{millis, RunStatistics};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Column layout of the export. Downstream sheets depend on this exact order.
pub const CSV_HEADER: [&str; 9] = [
    "Threads",
    "Throughput (ops/s)",
    "Avg Latency (ms)",
    "P50 Latency (ms)",
    "P90 Latency (ms)",
    "P95 Latency (ms)",
    "P99 Latency (ms)",
    "Max Latency (ms)",
    "Success Rate (%)",
];

/// Write one header row and one row per result.
pub fn write_csv<W: Write>(writer: W, series: &[RunStatistics]) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(CSV_HEADER)?;

    for stats in series {
        wtr.write_record([
            stats.workers.to_string(),
            format!("{:.2}", stats.throughput),
            format!("{:.2}", millis(stats.latency.average)),
            format!("{:.2}", millis(stats.latency.p50)),
            format!("{:.2}", millis(stats.latency.p90)),
            format!("{:.2}", millis(stats.latency.p95)),
            format!("{:.2}", millis(stats.latency.p99)),
            format!("{:.2}", millis(stats.latency.max)),
            format!("{:.2}", stats.success_rate * 100.),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

pub fn export_csv_file(path: impl AsRef<Path>, series: &[RunStatistics]) -> Result<(), ExportError> {
    let path = path.as_ref();
    let file = File::create(path)?;
    write_csv(BufWriter::new(file), series)?;
    info!("Results exported to {}", path.display());
    Ok(())
}
