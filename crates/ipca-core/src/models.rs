use std::fmt;
use std::path::PathBuf;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// A `(year, month)` pair identifying the coverage of one input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Period {
    year: i32,
    month: u32,
}

impl Period {
    /// Build a period, returning `None` unless `year` has four digits and
    /// `month` is a calendar month.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if !(1000..=9999).contains(&year) {
            return None;
        }
        let first = NaiveDate::from_ymd_opt(year, month, 1)?;
        Some(Self {
            year: first.year(),
            month: first.month(),
        })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// One data row of a wide period table.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    /// First-column label, still carrying its numbering prefix.
    pub group: String,
    /// One cell per region column; `None` when the row ended early.
    pub cells: Vec<Option<String>>,
}

/// A parsed input file: rows are expenditure groups, columns are regions.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPeriodTable {
    /// Period derived from the file name.
    pub period: Period,
    /// File the table was read from.
    pub source: PathBuf,
    /// Region headers, verbatim and in column order.
    pub regions: Vec<String>,
    /// Data rows in file order.
    pub rows: Vec<RawRow>,
}

impl RawPeriodTable {
    /// Number of cells in the wide table (rows × region columns).
    pub fn cell_count(&self) -> usize {
        self.rows.len() * self.regions.len()
    }
}

/// One `(period, group, region)` observation of the long table.
///
/// Serialized with the dataset's own column names so the on-disk table and
/// the JSON payload agree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LongRecord {
    #[serde(rename = "ano")]
    pub year: i32,
    #[serde(rename = "mes")]
    pub month: u32,
    #[serde(rename = "grupo")]
    pub group: String,
    #[serde(rename = "regiao")]
    pub region: String,
    #[serde(rename = "variacao")]
    pub variation: f64,
}

/// Output column names, in file order.
pub const OUTPUT_COLUMNS: [&str; 5] = ["ano", "mes", "grupo", "regiao", "variacao"];
