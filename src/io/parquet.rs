use crate::error::LargePosError;
use crate::io::arrow::{PositionsToArrow, positions_from_record_batch};
use crate::position::LargePosition;
use arrow_array::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use std::fs::File;
use std::path::Path;
use tracing::{debug, info};

/// Writes a batch to a Parquet file, replacing any existing file.
pub fn write_parquet(batch: &RecordBatch, path: impl AsRef<Path>) -> Result<(), LargePosError> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| LargePosError::IoError(e.to_string()))?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None)
        .map_err(|e| LargePosError::ParquetError(e.to_string()))?;

    writer
        .write(batch)
        .map_err(|e| LargePosError::ParquetError(e.to_string()))?;
    writer
        .close()
        .map_err(|e| LargePosError::ParquetError(e.to_string()))?;

    info!(path = %path.display(), rows = batch.num_rows(), "parquet written");
    Ok(())
}

/// Reads every position from a Parquet file written by [`write_parquet`].
pub fn read_parquet(path: impl AsRef<Path>) -> Result<Vec<LargePosition>, LargePosError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| LargePosError::IoError(e.to_string()))?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)
        .map_err(|e| LargePosError::ParquetError(e.to_string()))?
        .build()
        .map_err(|e| LargePosError::ParquetError(e.to_string()))?;

    let mut positions = Vec::new();
    for batch in reader {
        let batch = batch.map_err(|e| LargePosError::ArrowError(e.to_string()))?;
        positions.extend(positions_from_record_batch(&batch)?);
    }

    debug!(path = %path.display(), rows = positions.len(), "parquet read");
    Ok(positions)
}

pub trait PositionsToParquet: PositionsToArrow {
    fn to_parquet(&self, path: impl AsRef<Path>) -> Result<(), LargePosError>;
}

impl PositionsToParquet for [LargePosition] {
    fn to_parquet(&self, path: impl AsRef<Path>) -> Result<(), LargePosError> {
        let batch = self.to_record_batch()?;
        write_parquet(&batch, path)
    }
}

impl PositionsToParquet for Vec<LargePosition> {
    fn to_parquet(&self, path: impl AsRef<Path>) -> Result<(), LargePosError> {
        self.as_slice().to_parquet(path)
    }
}
