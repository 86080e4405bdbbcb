//! Period file discovery and loading.
//!
//! Finds the `YYYY_MM.csv` files of an input directory and parses each one
//! into a [`RawPeriodTable`] for the reshape step.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use ipca_core::error::{IpcaError, Result};
use ipca_core::models::{Period, RawPeriodTable, RawRow};
use regex::Regex;
use tracing::debug;

/// Field delimiter of the raw monthly tables.
pub const INPUT_DELIMITER: u8 = b';';

// ── Public types ──────────────────────────────────────────────────────────────

/// An input file together with the period its name encodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodFile {
    pub period: Period,
    pub path: PathBuf,
}

/// Result of scanning an input directory.
#[derive(Debug, Clone, Default)]
pub struct Discovery {
    /// Matching files, sorted by file name.
    pub files: Vec<PeriodFile>,
    /// Regular files whose name does not denote a period.
    pub skipped: Vec<PathBuf>,
}

// ── Public API ────────────────────────────────────────────────────────────────

fn period_filename_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)^(\d{4})_(\d{2})\.csv$").expect("regex is valid"))
}

/// Extract the period from a file name such as `2024_01.csv`.
///
/// Returns `None` for names that do not match, and for names whose month is
/// not a calendar month (`2024_13.csv`).
pub fn parse_period_filename(name: &str) -> Option<Period> {
    let caps = period_filename_pattern().captures(name)?;
    let year: i32 = caps.get(1)?.as_str().parse().ok()?;
    let month: u32 = caps.get(2)?.as_str().parse().ok()?;
    Period::new(year, month)
}

/// List the period files directly under `input_dir`.
///
/// Sub-directories are not descended into. Non-matching names are skipped
/// silently and reported in [`Discovery::skipped`].
pub fn find_period_files(input_dir: &Path) -> Result<Discovery> {
    if !input_dir.is_dir() {
        return Err(IpcaError::InputDirNotFound(input_dir.to_path_buf()));
    }

    let mut discovery = Discovery::default();

    for entry in walkdir::WalkDir::new(input_dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
    {
        let entry = entry.map_err(|e| IpcaError::FileRead {
            path: input_dir.to_path_buf(),
            source: e.into(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let period = entry
            .file_name()
            .to_str()
            .and_then(parse_period_filename);

        match period {
            Some(period) => discovery.files.push(PeriodFile {
                period,
                path: entry.into_path(),
            }),
            None => {
                debug!("Skipping {}: not a period file", entry.path().display());
                discovery.skipped.push(entry.into_path());
            }
        }
    }

    discovery
        .files
        .sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));
    discovery.skipped.sort();

    Ok(discovery)
}

/// Parse one `;`-delimited period table.
///
/// The first column is the group label whatever its header says; every
/// other header is a region. Rows shorter than the header are padded with
/// missing cells, rows longer than the header are rejected.
pub fn read_period_table(path: &Path, period: Period) -> Result<RawPeriodTable> {
    let file = std::fs::File::open(path).map_err(|source| IpcaError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(INPUT_DELIMITER)
        .has_headers(true)
        .flexible(true)
        .from_reader(file);

    let csv_err = |source: csv::Error| IpcaError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let headers = reader.headers().map_err(csv_err)?.clone();
    if headers.is_empty() {
        return Err(IpcaError::EmptyTable(path.to_path_buf()));
    }
    let width = headers.len();
    let regions: Vec<String> = headers.iter().skip(1).map(str::to_string).collect();

    let mut rows: Vec<RawRow> = Vec::new();
    for result in reader.records() {
        let record = result.map_err(csv_err)?;
        if record.len() > width {
            return Err(IpcaError::MalformedRow {
                path: path.to_path_buf(),
                line: record.position().map(|p| p.line()).unwrap_or(0),
                expected: width,
                found: record.len(),
            });
        }

        let group = record.get(0).unwrap_or_default().to_string();
        let cells = (1..width)
            .map(|i| record.get(i).map(str::to_string))
            .collect();
        rows.push(RawRow { group, cells });
    }

    debug!(
        "File {}: {} rows, {} regions",
        path.display(),
        rows.len(),
        regions.len()
    );

    Ok(RawPeriodTable {
        period,
        source: path.to_path_buf(),
        regions,
        rows,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
