use csv::ReaderBuilder;
use std::{borrow::Cow, io::Cursor};
use tracing::{debug, trace};

static MISSING: Cell = Cell::Missing;

/// A single parsed CSV cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    /// Empty or whitespace-only field, or a field missing from a short row.
    Missing,
    /// Field whose trimmed text is the canonical rendering of an `i64`.
    Integer(i64),
    /// Anything else, kept verbatim.
    Text(String),
}

impl Cell {
    pub fn from_field(field: &str) -> Self {
        let trimmed = field.trim();
        if trimmed.is_empty() {
            return Cell::Missing;
        }
        match trimmed.parse::<i64>() {
            // "007" or "+7" stay text so no characters are lost
            Ok(v) if v.to_string() == trimmed => Cell::Integer(v),
            _ => Cell::Text(field.to_string()),
        }
    }

    /// Stringified value; `None` for missing cells.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Cell::Missing => None,
            Cell::Integer(v) => Some(Cow::Owned(v.to_string())),
            Cell::Text(s) => Some(Cow::Borrowed(s.as_str())),
        }
    }
}

#[derive(Debug, Default)]
pub struct RawTable {
    /// Column names, trimmed and lower-cased.
    pub headers: Vec<String>,
    /// Data rows, padded or truncated to `headers.len()` cells.
    pub rows: Vec<Vec<Cell>>,
}

impl RawTable {
    /// Position of the first column named exactly `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Cells of column `idx`, one per row.
    pub fn column(&self, idx: usize) -> impl Iterator<Item = &Cell> + '_ {
        self.rows.iter().map(move |row| row.get(idx).unwrap_or(&MISSING))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Trim + lower-case a header name.
pub fn normalize_header(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Byte offset where physical line `line_idx` (0-based) starts, or `None`
/// if the text has fewer lines.
pub fn line_offset(text: &str, line_idx: usize) -> Option<usize> {
    if line_idx == 0 {
        return Some(0);
    }
    text.match_indices('\n')
        .nth(line_idx - 1)
        .map(|(pos, _)| pos + 1)
        .filter(|&pos| pos < text.len())
}

/// Parse `text` as a comma-separated table whose header is its first record.
///
/// Returns `Ok(None)` when there is no header record at all.
pub fn read_table(text: &str) -> Result<Option<RawTable>, csv::Error> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true) // ragged rows are padded/truncated below
        .from_reader(Cursor::new(text.as_bytes()));

    let mut records = rdr.records();
    let headers: Vec<String> = match records.next() {
        Some(result) => result?.iter().map(normalize_header).collect(),
        None => return Ok(None),
    };
    trace!(?headers, "parsed header record");

    let width = headers.len();
    let mut rows = Vec::new();
    let mut ragged = 0usize;
    for result in records {
        let record = result?;
        if record.len() != width {
            ragged += 1;
        }
        let mut row: Vec<Cell> = record.iter().take(width).map(Cell::from_field).collect();
        row.resize(width, Cell::Missing);
        rows.push(row);
    }
    if ragged > 0 {
        debug!(ragged, width, "rows with a field count different from the header");
    }

    Ok(Some(RawTable { headers, rows }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn classifies_cells() {
        assert_eq!(Cell::from_field(""), Cell::Missing);
        assert_eq!(Cell::from_field("   "), Cell::Missing);
        assert_eq!(Cell::from_field(" 42 "), Cell::Integer(42));
        assert_eq!(Cell::from_field("-3"), Cell::Integer(-3));
        assert_eq!(Cell::from_field("007"), Cell::Text("007".into()));
        assert_eq!(Cell::from_field("1.234,0"), Cell::Text("1.234,0".into()));
    }

    #[test]
    fn line_offsets() {
        let text = "a\nb\nc";
        assert_eq!(line_offset(text, 0), Some(0));
        assert_eq!(line_offset(text, 1), Some(2));
        assert_eq!(line_offset(text, 2), Some(4));
        assert_eq!(line_offset(text, 3), None);
        assert_eq!(line_offset("a\nb\n", 2), None);
    }

    #[test]
    fn reads_table_with_normalised_headers() -> Result<()> {
        let text = " Query ,IMPRESSIONS,Clicks\n\"løb, sko\",\"1.234,0\",3\n\nshort\n";
        let table = read_table(text)?.expect("header record");
        assert_eq!(table.headers, vec!["query", "impressions", "clicks"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0][0], Cell::Text("løb, sko".into()));
        assert_eq!(table.rows[0][2], Cell::Integer(3));
        assert_eq!(table.rows[1], vec![Cell::Text("short".into()), Cell::Missing, Cell::Missing]);
        assert_eq!(table.column_index("clicks"), Some(2));
        assert_eq!(table.column(1).count(), 2);
        Ok(())
    }

    #[test]
    fn empty_text_has_no_table() -> Result<()> {
        assert!(read_table("")?.is_none());
        Ok(())
    }
}
