//! Label cleaning for group rows, region headers and missing-value markers.

use std::sync::OnceLock;

use regex::Regex;

/// Cell contents treated as missing in addition to empty cells.
///
/// These are the conventional NA spellings produced by spreadsheet exports.
pub const MISSING_MARKERS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN", "<NA>",
    "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn group_prefix_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d+\.").expect("regex is valid"))
}

/// Remove a leading `"<digits>."` numbering prefix, then trim whitespace.
///
/// `"1. Alimentação e bebidas"` becomes `"Alimentação e bebidas"`.
pub fn clean_group_label(raw: &str) -> String {
    group_prefix_pattern().replace(raw, "").trim().to_string()
}

/// Trim surrounding whitespace from a region header.
pub fn clean_region_label(raw: &str) -> String {
    raw.trim().to_string()
}

/// `true` when a raw cell carries no value.
pub fn is_missing(raw: &str) -> bool {
    let value = raw.trim();
    value.is_empty() || MISSING_MARKERS.contains(&value)
}
