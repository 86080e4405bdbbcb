//! Wide-to-long reshape of one period table.

use ipca_core::decimal::parse_decimal_comma;
use ipca_core::error::{IpcaError, Result};
use ipca_core::labels::{clean_group_label, clean_region_label, is_missing};
use ipca_core::models::{LongRecord, RawPeriodTable};

/// Melt `table` into one [`LongRecord`] per non-missing cell.
///
/// Records come out group-major, region-minor, in file order. Missing cells
/// are dropped before any numeric parsing; a present but malformed value
/// fails the whole table.
pub fn reshape_period(table: &RawPeriodTable) -> Result<Vec<LongRecord>> {
    let regions: Vec<String> = table
        .regions
        .iter()
        .map(|r| clean_region_label(r))
        .collect();

    let mut records = Vec::with_capacity(table.cell_count());

    for row in &table.rows {
        let group = clean_group_label(&row.group);

        for (region, cell) in regions.iter().zip(&row.cells) {
            let Some(raw) = cell.as_deref().filter(|v| !is_missing(v)) else {
                continue;
            };

            let variation =
                parse_decimal_comma(raw).map_err(|source| IpcaError::InvalidValue {
                    path: table.source.clone(),
                    group: group.clone(),
                    region: region.clone(),
                    source,
                })?;

            records.push(LongRecord {
                year: table.period.year(),
                month: table.period.month(),
                group: group.clone(),
                region: region.clone(),
                variation,
            });
        }
    }

    Ok(records)
}
