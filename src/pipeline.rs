//! One reconciliation run: ingest both exports, aggregate, join, filter.
//!
//! Nothing survives between calls; a "reset" is just another call with fresh
//! bytes.

use std::time::Instant;
use tracing::info;

use crate::{
    config::{ColumnProfile, FilterParams},
    error::Result,
    ingest::{ingest_ads, ingest_organic, IngestStats},
    reconcile::{self, ReconciledRecord},
    report::Report,
};

/// The unfiltered join of one run, ready to be filtered any number of times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    pub records: Vec<ReconciledRecord>,
    pub ads_stats: IngestStats,
    pub organic_stats: IngestStats,
}

impl Reconciliation {
    /// Apply `params`, producing the ordered report.
    pub fn into_report(self, params: &FilterParams) -> Report {
        let reconciled_rows = self.records.len();
        let campaigns = reconcile::campaigns(&self.records);
        let rows = reconcile::filter(self.records, params);
        Report {
            rows,
            reconciled_rows,
            campaigns,
            ads_stats: self.ads_stats,
            organic_stats: self.organic_stats,
        }
    }
}

/// Ingest, aggregate and join both exports. Structural problems in either
/// export abort the run before any output exists.
#[tracing::instrument(level = "info", skip_all)]
pub fn reconcile_exports(
    ads_bytes: &[u8],
    organic_bytes: &[u8],
    profile: &ColumnProfile,
) -> Result<Reconciliation> {
    let start = Instant::now();

    let ads = ingest_ads(ads_bytes, profile)?;
    let organic = ingest_organic(organic_bytes)?;

    let ads_agg = reconcile::aggregate_ads(ads.records);
    let organic_agg = reconcile::aggregate_organic(organic.records);
    info!(
        ads_groups = ads_agg.len(),
        organic_terms = organic_agg.len(),
        "aggregated"
    );

    let records = reconcile::reconcile(ads_agg, organic_agg);
    let hidden = records.iter().filter(|r| !r.visible).count();
    info!(
        rows = records.len(),
        hidden,
        elapsed = ?start.elapsed(),
        "reconciled"
    );

    Ok(Reconciliation {
        records,
        ads_stats: ads.stats,
        organic_stats: organic.stats,
    })
}

/// Full run: [`reconcile_exports`] followed by filtering.
pub fn run(
    ads_bytes: &[u8],
    organic_bytes: &[u8],
    profile: &ColumnProfile,
    params: &FilterParams,
) -> Result<Report> {
    let report = reconcile_exports(ads_bytes, organic_bytes, profile)?.into_report(params);
    if report.is_empty() {
        info!("no rows match the current filters");
    } else {
        info!(rows = report.len(), "report ready");
    }
    Ok(report)
}
