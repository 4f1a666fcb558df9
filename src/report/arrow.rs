use arrow::{
    array::{ArrayRef, BooleanArray, StringArray, UInt64Array},
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
};
use parquet::{arrow::ArrowWriter, basic::Compression, file::properties::WriterProperties};
use std::{fs::File, path::Path, sync::Arc};
use tracing::info;

use crate::{error::Result, reconcile::ReconciledRecord, report::Report};

use super::COLUMNS;

pub fn report_schema() -> Schema {
    Schema::new(vec![
        Field::new(COLUMNS[0], DataType::Utf8, false),
        Field::new(COLUMNS[1], DataType::Utf8, false),
        Field::new(COLUMNS[2], DataType::UInt64, false),
        Field::new(COLUMNS[3], DataType::UInt64, false),
        Field::new(COLUMNS[4], DataType::UInt64, false),
        Field::new(COLUMNS[5], DataType::Boolean, false),
    ])
}

/// Columnar view of `records`, row order preserved.
pub fn to_record_batch(records: &[ReconciledRecord]) -> Result<RecordBatch> {
    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from_iter_values(records.iter().map(|r| r.term.as_str()))),
        Arc::new(StringArray::from_iter_values(records.iter().map(|r| r.campaign.as_str()))),
        Arc::new(UInt64Array::from_iter_values(records.iter().map(|r| r.ads_exposures))),
        Arc::new(UInt64Array::from_iter_values(records.iter().map(|r| r.ads_interactions))),
        Arc::new(UInt64Array::from_iter_values(
            records.iter().map(|r| r.organic_impressions),
        )),
        Arc::new(BooleanArray::from(
            records.iter().map(|r| r.visible).collect::<Vec<bool>>(),
        )),
    ];
    Ok(RecordBatch::try_new(Arc::new(report_schema()), columns)?)
}

/// Write `records` as a single-row-group Parquet file.
pub fn write_parquet(records: &[ReconciledRecord], path: &Path) -> Result<()> {
    let batch = to_record_batch(records)?;
    let file = File::create(path)?;
    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();
    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))?;
    writer.write(&batch)?;
    writer.close()?;
    info!(rows = records.len(), path = %path.display(), "wrote parquet report");
    Ok(())
}

impl Report {
    pub fn to_record_batch(&self) -> Result<RecordBatch> {
        to_record_batch(&self.rows)
    }

    pub fn write_parquet(&self, path: &Path) -> Result<()> {
        write_parquet(&self.rows, path)
    }
}
