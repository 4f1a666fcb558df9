//! Column resolution: turn a header list into concrete column positions, or a
//! typed failure naming what was found instead.

use crate::{
    error::{ReconcileError, Result},
    ingest::Export,
    process::raw_table::RawTable,
};

/// First column whose name equals one of `candidates`, tried in order.
pub fn resolve_exact(table: &RawTable, candidates: &[String]) -> Option<usize> {
    candidates.iter().find_map(|name| table.column_index(name))
}

/// First column (in header order) whose name contains any of `fragments`.
pub fn resolve_fragment(table: &RawTable, fragments: &[String]) -> Option<usize> {
    table
        .headers
        .iter()
        .position(|h| fragments.iter().any(|f| h.contains(f.as_str())))
}

/// Like [`resolve_exact`] but a miss is a `MissingRequiredColumn`.
pub fn require_exact(table: &RawTable, export: Export, candidates: &[String]) -> Result<usize> {
    resolve_exact(table, candidates).ok_or_else(|| missing(table, export, candidates.join(" | ")))
}

/// Like [`resolve_fragment`] but a miss is a `MissingRequiredColumn`.
pub fn require_fragment(table: &RawTable, export: Export, fragments: &[String]) -> Result<usize> {
    resolve_fragment(table, fragments).ok_or_else(|| {
        let wanted: Vec<String> = fragments.iter().map(|f| format!("*{}*", f)).collect();
        missing(table, export, wanted.join(" | "))
    })
}

fn missing(table: &RawTable, export: Export, column: String) -> ReconcileError {
    ReconcileError::MissingRequiredColumn {
        export,
        column,
        found: table.headers.clone(),
    }
}

/// Index of the first line that, lower-cased, starts with `prefix` and
/// contains `token`.
pub fn find_header_line(text: &str, prefix: &str, token: &str) -> Option<usize> {
    text.lines().position(|line| {
        let lower = line.to_lowercase();
        lower.starts_with(prefix) && lower.contains(token)
    })
}
