use once_cell::sync::Lazy;
use regex::Regex;

use crate::process::raw_table::Cell;

/// Zero-decimal suffix left by locale-formatted exports, e.g. `"1.234,0"`.
static ZERO_DECIMAL_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.,]0$").unwrap());

/// Parse a metric where both `.` and `,` are thousands separators.
///
/// Missing cells are `Some(0)`. `None` is the not-a-number marker: the text
/// did not reduce to a non-negative integer once separators were removed.
pub fn coerce_grouped_numeric(cell: &Cell) -> Option<u64> {
    match cell {
        Cell::Missing => Some(0),
        Cell::Integer(v) => u64::try_from(*v).ok(),
        Cell::Text(raw) => {
            let digits: String = raw.trim().chars().filter(|c| *c != '.' && *c != ',').collect();
            parse_non_negative(&digits)
        }
    }
}

/// Parse an Organic impression/click count. Never fails: anything
/// unparsable is 0.
pub fn coerce_impression_count(cell: &Cell) -> u64 {
    try_impression_count(cell).unwrap_or(0)
}

/// Same parse as [`coerce_impression_count`] without the fallback. Missing
/// cells are `Some(0)`; `None` means the cell held something unparsable.
pub fn try_impression_count(cell: &Cell) -> Option<u64> {
    match cell {
        Cell::Missing => Some(0),
        Cell::Integer(v) => u64::try_from(*v).ok(),
        Cell::Text(raw) => {
            let trimmed = raw.trim();
            let without_suffix = ZERO_DECIMAL_SUFFIX.replace(trimmed, "");
            let digits = without_suffix.replace('.', "");
            digits.parse::<u64>().ok()
        }
    }
}

fn parse_non_negative(s: &str) -> Option<u64> {
    if let Ok(v) = s.parse::<u64>() {
        return Some(v);
    }
    // scientific notation and the like; separators are already gone
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 && v <= u64::MAX as f64 => Some(v.trunc() as u64),
        _ => None,
    }
}
