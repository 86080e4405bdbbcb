//! Batch ETL pipeline.
//!
//! Discovers the period files, reads and reshapes each one in discovery
//! order, and writes the concatenated long table in a single atomic step.
//! Any error aborts the run before the output file is touched.

use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::Utc;
use ipca_core::error::{IpcaError, Result};
use ipca_core::models::{LongRecord, Period};
use ipca_core::settings::PipelineConfig;
use serde::Serialize;
use tracing::{debug, info};

use crate::output::write_output_table;
use crate::reader::{find_period_files, read_period_table};
use crate::reshape::reshape_period;

// ── Public types ──────────────────────────────────────────────────────────────

/// Per-file diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct PeriodSummary {
    pub period: Period,
    pub source: PathBuf,
    /// Data rows in the wide table.
    pub rows_read: usize,
    /// Long records produced.
    pub records: usize,
    /// Cells dropped as missing.
    pub missing_cells: usize,
}

/// The in-memory long table plus what went into it.
#[derive(Debug, Clone)]
pub struct LongTable {
    pub records: Vec<LongRecord>,
    pub periods: Vec<PeriodSummary>,
    pub files_skipped: usize,
}

/// Diagnostics of a completed [`run_etl`] call.
#[derive(Debug, Clone, Serialize)]
pub struct EtlSummary {
    /// RFC 3339 timestamp of when the output was written.
    pub generated_at: String,
    pub output_path: PathBuf,
    pub files_discovered: usize,
    pub files_skipped: usize,
    pub periods: Vec<PeriodSummary>,
    pub rows_written: usize,
    pub elapsed_seconds: f64,
}

// ── Public functions ──────────────────────────────────────────────────────────

/// Build the long table from every period file under `input_dir`.
///
/// Fails with [`IpcaError::NoPeriodFiles`] when nothing matches.
pub fn build_long_table(input_dir: &Path) -> Result<LongTable> {
    let discovery = find_period_files(input_dir)?;
    if discovery.files.is_empty() {
        return Err(IpcaError::NoPeriodFiles(input_dir.to_path_buf()));
    }

    let mut records: Vec<LongRecord> = Vec::new();
    let mut periods: Vec<PeriodSummary> = Vec::with_capacity(discovery.files.len());

    for file in &discovery.files {
        let table = read_period_table(&file.path, file.period)?;
        let period_records = reshape_period(&table)?;

        let summary = PeriodSummary {
            period: file.period,
            source: file.path.clone(),
            rows_read: table.rows.len(),
            records: period_records.len(),
            missing_cells: table.cell_count() - period_records.len(),
        };
        debug!(
            period = %summary.period,
            rows = summary.rows_read,
            records = summary.records,
            missing = summary.missing_cells,
            "reshaped {}",
            file.path.display()
        );

        periods.push(summary);
        records.extend(period_records);
    }

    Ok(LongTable {
        records,
        periods,
        files_skipped: discovery.skipped.len(),
    })
}

/// Run the full batch: build the long table and write it to
/// `config.output_path`.
pub fn run_etl(config: &PipelineConfig) -> Result<EtlSummary> {
    let start = Instant::now();
    info!(
        "ETL starting: {} -> {}",
        config.input_dir.display(),
        config.output_path.display()
    );

    let table = build_long_table(&config.input_dir)?;
    write_output_table(&config.output_path, &table.records)?;

    let summary = EtlSummary {
        generated_at: Utc::now().to_rfc3339(),
        output_path: config.output_path.clone(),
        files_discovered: table.periods.len(),
        files_skipped: table.files_skipped,
        rows_written: table.records.len(),
        periods: table.periods,
        elapsed_seconds: start.elapsed().as_secs_f64(),
    };

    info!(
        files = summary.files_discovered,
        skipped = summary.files_skipped,
        rows = summary.rows_written,
        "ETL finished"
    );

    Ok(summary)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
