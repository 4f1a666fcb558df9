use csv::{Terminator, WriterBuilder};
use serde::Serialize;

use crate::{
    error::{ReconcileError, Result},
    reconcile::ReconciledRecord,
    report::Report,
};

#[derive(Serialize)]
struct CsvRow<'a> {
    #[serde(rename = "Ads search term")]
    term: &'a str,
    #[serde(rename = "Ads campaign")]
    campaign: &'a str,
    #[serde(rename = "Ads exposures")]
    ads_exposures: u64,
    #[serde(rename = "Ads interactions")]
    ads_interactions: u64,
    #[serde(rename = "Organic exposures")]
    organic_impressions: u64,
    #[serde(rename = "Visible organically")]
    visible: bool,
}

impl<'a> From<&'a ReconciledRecord> for CsvRow<'a> {
    fn from(r: &'a ReconciledRecord) -> Self {
        Self {
            term: &r.term,
            campaign: &r.campaign,
            ads_exposures: r.ads_exposures,
            ads_interactions: r.ads_interactions,
            organic_impressions: r.organic_impressions,
            visible: r.visible,
        }
    }
}

/// UTF-8 CSV of `records`: header row, then one `\n`-terminated line per record
/// in the given order.
pub fn to_csv(records: &[ReconciledRecord]) -> Result<Vec<u8>> {
    let mut wtr = WriterBuilder::new()
        .has_headers(false)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    // explicit header so an empty report still has one
    wtr.write_record(super::COLUMNS)?;
    for record in records {
        wtr.serialize(CsvRow::from(record))?;
    }
    wtr.into_inner()
        .map_err(|e| ReconcileError::Io(e.into_error()))
}

impl Report {
    pub fn to_csv(&self) -> Result<Vec<u8>> {
        to_csv(&self.rows)
    }
}
