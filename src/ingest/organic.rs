use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    config::{
        ORGANIC_CLICKS_COLUMN, ORGANIC_HEADER_PREFIX, ORGANIC_HEADER_TOKEN,
        ORGANIC_IMPRESSIONS_COLUMN, ORGANIC_QUERY_COLUMN,
    },
    error::{ReconcileError, Result},
    ingest::{Export, IngestStats, Ingested},
    process::{
        columns::find_header_line,
        decode_export,
        numeric::try_impression_count,
        raw_table::{line_offset, read_table, Cell},
        term::normalize_cell,
    },
};

/// One organic-search query row after cleaning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrganicRecord {
    pub term: String,
    pub impressions: u64,
    /// Parsed but not used by reconciliation.
    pub clicks: u64,
}

/// Parse an Organic (search console) query export.
///
/// Any number of preamble lines may precede the table; the header is the first
/// line starting with `query,` that also mentions `impressions`.
#[tracing::instrument(level = "info", skip(bytes), fields(size = bytes.len()))]
pub fn ingest_organic(bytes: &[u8]) -> Result<Ingested<OrganicRecord>> {
    let text = decode_export(bytes);
    let header_line = find_header_line(&text, ORGANIC_HEADER_PREFIX, ORGANIC_HEADER_TOKEN)
        .ok_or(ReconcileError::HeaderNotFound {
            export: Export::Organic,
        })?;
    debug!(header_line, "organic header located");

    let start = line_offset(&text, header_line).ok_or(ReconcileError::HeaderNotFound {
        export: Export::Organic,
    })?;
    let table = read_table(&text[start..])
        .map_err(|error| ReconcileError::Csv {
            export: Export::Organic,
            error,
        })?
        .ok_or(ReconcileError::HeaderNotFound {
            export: Export::Organic,
        })?;

    let (query_col, impressions_col) = match (
        table.column_index(ORGANIC_QUERY_COLUMN),
        table.column_index(ORGANIC_IMPRESSIONS_COLUMN),
    ) {
        (Some(q), Some(i)) => (q, i),
        (q, _) => {
            let column = if q.is_none() {
                ORGANIC_QUERY_COLUMN
            } else {
                ORGANIC_IMPRESSIONS_COLUMN
            };
            return Err(ReconcileError::MissingRequiredColumn {
                export: Export::Organic,
                column: column.to_string(),
                found: table.headers.clone(),
            });
        }
    };
    let clicks_col = table.column_index(ORGANIC_CLICKS_COLUMN);

    let mut stats = IngestStats {
        rows_read: table.len(),
        ..Default::default()
    };
    let mut records = Vec::with_capacity(table.len());
    for (idx, row) in table.rows.iter().enumerate() {
        let impressions = count(&row[impressions_col], idx, &mut stats);
        let clicks = match clicks_col {
            Some(col) => count(&row[col], idx, &mut stats),
            None => 0,
        };
        records.push(OrganicRecord {
            term: normalize_cell(&row[query_col]),
            impressions,
            clicks,
        });
    }

    if stats.malformed_cells > 0 {
        warn!(
            malformed = stats.malformed_cells,
            "organic export had numeric cells that could not be parsed; counted as 0"
        );
    }
    info!(rows = records.len(), "organic export ingested");
    Ok(Ingested { records, stats })
}

fn count(cell: &Cell, row: usize, stats: &mut IngestStats) -> u64 {
    match try_impression_count(cell) {
        Some(v) => v,
        None => {
            debug!(row, ?cell, "not a count");
            stats.malformed_cells += 1;
            0
        }
    }
}
