use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    config::{ColumnProfile, ADS_METADATA_LINES},
    error::{ReconcileError, Result},
    ingest::{Export, IngestStats, Ingested},
    process::{
        columns::{require_exact, require_fragment, resolve_exact},
        decode_export,
        numeric::coerce_grouped_numeric,
        raw_table::{line_offset, read_table, Cell},
        term::normalize_ads_term,
    },
};

/// One paid-search row after cleaning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdsRecord {
    pub term: String,
    pub campaign: String,
    pub exposures: u64,
    pub interactions: u64,
}

/// Parse an Ads search-terms export.
///
/// The first [`ADS_METADATA_LINES`] lines are report metadata; the header is
/// the line after them. Fails when the term or exposures column is absent.
#[tracing::instrument(level = "info", skip(bytes, profile), fields(size = bytes.len()))]
pub fn ingest_ads(bytes: &[u8], profile: &ColumnProfile) -> Result<Ingested<AdsRecord>> {
    let text = decode_export(bytes);
    let start = line_offset(&text, ADS_METADATA_LINES)
        .ok_or(ReconcileError::EmptyInput { export: Export::Ads })?;
    let table = read_table(&text[start..])
        .map_err(|error| ReconcileError::Csv {
            export: Export::Ads,
            error,
        })?
        .ok_or(ReconcileError::EmptyInput { export: Export::Ads })?;
    debug!(headers = ?table.headers, rows = table.len(), "ads table parsed");

    let term_col = require_exact(&table, Export::Ads, &profile.term)?;
    let exposures_col = require_fragment(&table, Export::Ads, &profile.exposures_fragments)?;
    let interactions_col = resolve_exact(&table, &profile.interactions);
    let campaign_col = resolve_exact(&table, &profile.campaign);
    if interactions_col.is_none() {
        debug!("no interactions column; interactions default to 0");
    }
    if campaign_col.is_none() {
        debug!("no campaign column; campaign defaults to empty");
    }

    let summary_terms = profile.summary_terms();
    let mut stats = IngestStats {
        rows_read: table.len(),
        ..Default::default()
    };
    let mut records = Vec::with_capacity(table.len());

    for (idx, row) in table.rows.iter().enumerate() {
        let term = normalize_ads_term(&row[term_col]);
        if term.is_empty() {
            stats.dropped_empty_term += 1;
            continue;
        }
        if summary_terms.contains(&term) {
            debug!(row = idx, term = %term, "dropping summary row");
            stats.dropped_summary += 1;
            continue;
        }

        let exposures = metric(&row[exposures_col], idx, &mut stats);
        let interactions = match interactions_col {
            Some(col) => metric(&row[col], idx, &mut stats),
            None => 0,
        };
        let campaign = match campaign_col {
            Some(col) => campaign_name(&row[col]),
            None => String::new(),
        };

        records.push(AdsRecord {
            term,
            campaign,
            exposures,
            interactions,
        });
    }

    if stats.malformed_cells > 0 {
        warn!(
            malformed = stats.malformed_cells,
            "ads export had numeric cells that could not be parsed; counted as 0"
        );
    }
    info!(
        kept = records.len(),
        empty = stats.dropped_empty_term,
        summary = stats.dropped_summary,
        "ads export ingested"
    );

    Ok(Ingested { records, stats })
}

fn metric(cell: &Cell, row: usize, stats: &mut IngestStats) -> u64 {
    match coerce_grouped_numeric(cell) {
        Some(v) => v,
        None => {
            debug!(row, ?cell, "not a number");
            stats.malformed_cells += 1;
            0
        }
    }
}

fn campaign_name(cell: &Cell) -> String {
    cell.as_text()
        .map(|c| c.trim().to_lowercase())
        .unwrap_or_default()
}
