//! Run metrics, recorded through the `metrics` facade.
//!
//! Nothing is exported unless a recorder is installed; `--metrics-out`
//! installs a Prometheus recorder and writes its text exposition at the end
//! of the run.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::path::Path;

use crate::error::{ReportError, Result};

pub const FETCH_BYTES_TOTAL: &str = "fec_fetch_bytes_total";
pub const FETCH_DURATION_SECONDS: &str = "fec_fetch_duration_seconds";
pub const PARSE_ROWS_TOTAL: &str = "fec_parse_rows_total";
pub const PARSE_ROWS_SKIPPED_TOTAL: &str = "fec_parse_rows_skipped_total";
pub const PARSE_DURATION_SECONDS: &str = "fec_parse_duration_seconds";
pub const PIPELINE_RUNS_TOTAL: &str = "fec_pipeline_runs_total";
pub const PIPELINE_DURATION_SECONDS: &str = "fec_pipeline_duration_seconds";

pub fn record_fetch(dataset: &'static str, bytes: u64, duration_secs: f64) {
    metrics::counter!(FETCH_BYTES_TOTAL, "dataset" => dataset).increment(bytes);
    metrics::histogram!(FETCH_DURATION_SECONDS, "dataset" => dataset).record(duration_secs);
}

pub fn record_parse(dataset: &'static str, rows_kept: u64, rows_skipped: u64, duration_secs: f64) {
    metrics::counter!(PARSE_ROWS_TOTAL, "dataset" => dataset).increment(rows_kept);
    metrics::counter!(PARSE_ROWS_SKIPPED_TOTAL, "dataset" => dataset).increment(rows_skipped);
    metrics::histogram!(PARSE_DURATION_SECONDS, "dataset" => dataset).record(duration_secs);
}

pub fn record_run(duration_secs: f64) {
    metrics::counter!(PIPELINE_RUNS_TOTAL).increment(1);
    metrics::histogram!(PIPELINE_DURATION_SECONDS).record(duration_secs);
}

/// Install the Prometheus recorder as the global recorder
pub fn install_prometheus() -> Result<PrometheusHandle> {
    PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| ReportError::Config(format!("Failed to install metrics recorder: {}", e)))
}

/// Write the current Prometheus text exposition to `path`
pub fn write_exposition(handle: &PrometheusHandle, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, handle.render())?;
    Ok(())
}
