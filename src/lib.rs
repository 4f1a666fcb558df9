pub mod config;
pub mod error;
pub mod ingest;
pub mod pipeline;
pub mod process;
pub mod reconcile;
pub mod report;

pub use config::{ColumnProfile, FilterParams, ProfileName, RunConfig};
pub use error::ReconcileError;
pub use pipeline::{reconcile_exports, run, Reconciliation};
pub use reconcile::ReconciledRecord;
pub use report::Report;
