pub mod ads;
pub mod organic;

use serde::Serialize;
use std::fmt;

pub use ads::{ingest_ads, AdsRecord};
pub use organic::{ingest_organic, OrganicRecord};

/// Which upload a message or error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Export {
    Ads,
    Organic,
}

impl fmt::Display for Export {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Export::Ads => f.write_str("Ads"),
            Export::Organic => f.write_str("Organic"),
        }
    }
}

/// Row accounting for one ingest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestStats {
    /// Data rows read below the header.
    pub rows_read: usize,
    /// Rows dropped because their term normalised to nothing.
    pub dropped_empty_term: usize,
    /// Rows dropped because they were summary/total lines.
    pub dropped_summary: usize,
    /// Numeric cells that fell back to 0.
    pub malformed_cells: usize,
}

impl IngestStats {
    pub fn rows_kept(&self) -> usize {
        self.rows_read - self.dropped_empty_term - self.dropped_summary
    }
}

/// Records produced by an ingest plus how they were obtained.
#[derive(Debug, Clone)]
pub struct Ingested<T> {
    pub records: Vec<T>,
    pub stats: IngestStats,
}
