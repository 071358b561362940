//! Overwrite-mode table writes

use super::partition::partition_batch;
use super::writer::{encode_batch, ParquetWriterConfig};
use crate::error::Result;
use crate::storage::StorageLocation;
use crate::tables::Table;
use arrow::record_batch::RecordBatch;
use bytes::Bytes;
use chrono_tz::Tz;
use tracing::{debug, info};

/// File name of each data file inside a partition directory
pub const DATA_FILE_NAME: &str = "part-00000.parquet";

/// Empty marker written once a table is complete
pub const SUCCESS_MARKER: &str = "_SUCCESS";

/// Outcome of one table write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteSummary {
    /// Display URL of the table root
    pub table_url: String,
    /// Rows written across all files
    pub rows: usize,
    /// Data files written
    pub files: usize,
    /// Objects removed from the previous run
    pub replaced: usize,
}

/// Writes whole tables under an output root
#[derive(Debug, Clone)]
pub struct TableWriter {
    location: StorageLocation,
    /// Zone tagged on timestamp columns
    tz: Tz,
    config: ParquetWriterConfig,
}

impl TableWriter {
    /// Create a writer with default Parquet settings
    pub fn new(location: StorageLocation, tz: Tz) -> Self {
        Self::with_config(location, tz, ParquetWriterConfig::default())
    }

    /// Create a writer with explicit Parquet settings
    pub fn with_config(location: StorageLocation, tz: Tz, config: ParquetWriterConfig) -> Self {
        Self {
            location,
            tz,
            config,
        }
    }

    /// Output root
    pub fn location(&self) -> &StorageLocation {
        &self.location
    }

    /// Parquet settings used for every file
    pub fn config(&self) -> &ParquetWriterConfig {
        &self.config
    }

    /// Write a table of rows to its standard path
    pub async fn write<T: Table>(&self, rows: &[T]) -> Result<WriteSummary> {
        let batch = T::to_batch(rows, self.tz)?;
        let summary = self
            .write_batch(T::PATH, &batch, T::PARTITION_BY)
            .await?;
        info!(
            table = T::NAME,
            rows = summary.rows,
            files = summary.files,
            "Wrote {}",
            summary.table_url
        );
        Ok(summary)
    }

    /// Replace everything at `path` with `batch`, partitioned by `partition_by`
    ///
    /// Prior output is deleted first; there is no atomic swap, so a failure
    /// part way leaves a partial table behind.
    pub async fn write_batch(
        &self,
        path: &str,
        batch: &RecordBatch,
        partition_by: &[&str],
    ) -> Result<WriteSummary> {
        let path = path.trim_matches('/');
        let replaced = self.location.delete_prefix(path).await?;
        if replaced > 0 {
            debug!("Removed {replaced} objects from {}", self.location.url(path));
        }

        let groups = partition_batch(batch, partition_by)?;
        let mut rows = 0;
        for group in &groups {
            let file = if group.dir.is_empty() {
                format!("{path}/{DATA_FILE_NAME}")
            } else {
                format!("{path}/{}/{DATA_FILE_NAME}", group.dir)
            };
            let data = encode_batch(&group.batch, &self.config)?;
            let url = self.location.write(&file, data).await?;
            debug!("Wrote {} rows to {url}", group.batch.num_rows());
            rows += group.batch.num_rows();
        }

        self.location
            .write(&format!("{path}/{SUCCESS_MARKER}"), Bytes::new())
            .await?;

        Ok(WriteSummary {
            table_url: self.location.url(path),
            rows,
            files: groups.len(),
            replaced,
        })
    }
}
