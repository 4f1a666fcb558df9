use thiserror::Error;

use crate::ingest::Export;

/// Failures that abort a reconciliation run.
///
/// Per-cell numeric problems never show up here; they fall back to 0 and are
/// counted in [`crate::ingest::IngestStats`].
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("{export} export is missing required column '{column}'; found columns: {found:?}")]
    MissingRequiredColumn {
        export: Export,
        column: String,
        found: Vec<String>,
    },
    #[error("{export} export has no header line starting with 'query,' and containing 'impressions'")]
    HeaderNotFound { export: Export },
    #[error("{export} export has no header line")]
    EmptyInput { export: Export },
    #[error("failed to parse {export} export as CSV: {error}")]
    Csv {
        export: Export,
        #[source]
        error: csv::Error,
    },
    #[error("failed to write CSV: {0}")]
    CsvWrite(#[from] csv::Error),
    #[error("arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
    #[error("parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ReconcileError {
    /// `true` when the export's structure was not what the run expects,
    /// i.e. the wrong file was supplied or the export format drifted.
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            Self::MissingRequiredColumn { .. } | Self::HeaderNotFound { .. } | Self::EmptyInput { .. }
        )
    }
}

pub type Result<T, E = ReconcileError> = std::result::Result<T, E>;
