//! The tab-delimited long table on disk.
//!
//! [`write_output_table`] is the only writer and always replaces the file in
//! one rename, so a server reading the table concurrently sees either the
//! previous version or the new one, never a partial file.

use std::path::{Path, PathBuf};

use ipca_core::error::{IpcaError, Result};
use ipca_core::models::{LongRecord, OUTPUT_COLUMNS};
use tracing::{debug, warn};

/// Field delimiter of the output table.
pub const OUTPUT_DELIMITER: u8 = b'\t';

/// Serialize `records` (header included) into an in-memory buffer.
pub fn encode_output_table(records: &[LongRecord]) -> std::result::Result<Vec<u8>, csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(OUTPUT_DELIMITER)
        .has_headers(false)
        .from_writer(Vec::new());

    // Written by hand so an empty table still carries its header.
    writer.write_record(OUTPUT_COLUMNS)?;
    for record in records {
        writer.serialize(record)?;
    }

    writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))
}

/// Write the whole table to `path`, replacing any previous version.
///
/// Parent directories are created. The bytes go to a hidden temp file in
/// the same directory which is then renamed over `path`.
pub fn write_output_table(path: &Path, records: &[LongRecord]) -> Result<()> {
    let bytes = encode_output_table(records).map_err(|source| IpcaError::Csv {
        path: path.to_path_buf(),
        source,
    })?;

    let write_err = |source: std::io::Error| IpcaError::FileWrite {
        path: path.to_path_buf(),
        source,
    };

    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(parent).map_err(write_err)?;

    let tmp = temp_path_for(path, parent);
    std::fs::write(&tmp, &bytes).map_err(write_err)?;

    if let Err(e) = std::fs::rename(&tmp, path) {
        if let Err(cleanup) = std::fs::remove_file(&tmp) {
            warn!("Failed to remove temp file {}: {}", tmp.display(), cleanup);
        }
        return Err(write_err(e));
    }

    debug!(
        "Wrote {} records ({} bytes) to {}",
        records.len(),
        bytes.len(),
        path.display()
    );
    Ok(())
}

/// Load the table written by [`write_output_table`].
pub fn load_output_table(path: &Path) -> Result<Vec<LongRecord>> {
    let file = match std::fs::File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(IpcaError::OutputNotFound(path.to_path_buf()));
        }
        Err(source) => {
            return Err(IpcaError::FileRead {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(OUTPUT_DELIMITER)
        .has_headers(true)
        .from_reader(file);

    reader
        .deserialize::<LongRecord>()
        .map(|row| {
            row.map_err(|source| IpcaError::Csv {
                path: path.to_path_buf(),
                source,
            })
        })
        .collect()
}

fn temp_path_for(path: &Path, parent: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    parent.join(format!(".{}.tmp", name))
}
