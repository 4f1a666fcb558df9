pub mod aggregate;
pub mod filter;
pub mod join;

pub use aggregate::{aggregate_ads, aggregate_organic, AdsAggregate, AdsTotals, OrganicAggregate};
pub use filter::{apply as filter, campaigns};
pub use join::{reconcile, ReconciledRecord};
