use std::path::PathBuf;
use thiserror::Error;

use crate::decimal::ParseError;

/// All errors produced by the IPCA pipeline and server.
#[derive(Error, Debug)]
pub enum IpcaError {
    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The output table could not be written or moved into place.
    #[error("Failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed delimited input, including invalid UTF-8.
    #[error("Failed to parse CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// The file has no header row at all.
    #[error("No header row in {0}")]
    EmptyTable(PathBuf),

    /// A data row carries more fields than the header declares.
    #[error("Malformed row in {path} at line {line}: expected at most {expected} fields, found {found}")]
    MalformedRow {
        path: PathBuf,
        line: u64,
        expected: usize,
        found: usize,
    },

    /// A non-missing cell is not a valid comma-decimal number.
    #[error("Invalid value in {path} for group {group:?}, region {region:?}: {source}")]
    InvalidValue {
        path: PathBuf,
        group: String,
        region: String,
        #[source]
        source: ParseError,
    },

    /// The configured input directory does not exist.
    #[error("Input directory not found: {0}")]
    InputDirNotFound(PathBuf),

    /// No `YYYY_MM.csv` files were found under the given directory.
    #[error("No period files found in {0}")]
    NoPeriodFiles(PathBuf),

    /// The output table has not been produced yet.
    #[error("Output table not found: {0}")]
    OutputNotFound(PathBuf),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A JSON document could not be parsed or produced.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the ipca crates.
pub type Result<T> = std::result::Result<T, IpcaError>;
