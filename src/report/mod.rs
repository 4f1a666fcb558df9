pub mod arrow;
pub mod csv;

use serde::Serialize;
use std::collections::BTreeSet;

use crate::{ingest::IngestStats, reconcile::ReconciledRecord};

/// Column labels shared by every tabular rendering of a report.
pub const COLUMNS: [&str; 6] = [
    "Ads search term",
    "Ads campaign",
    "Ads exposures",
    "Ads interactions",
    "Organic exposures",
    "Visible organically",
];

/// Filtered, ordered output of one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub rows: Vec<ReconciledRecord>,
    /// Rows in the join before filtering.
    pub reconciled_rows: usize,
    /// Every campaign in the join, for the caller's campaign picker.
    pub campaigns: BTreeSet<String>,
    pub ads_stats: IngestStats,
    pub organic_stats: IngestStats,
}

impl Report {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// No row matched the filters. Not a failure.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn hidden_terms(&self) -> usize {
        self.rows.iter().filter(|r| !r.visible).count()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.rows)
    }
}
