//! Parquet encoding
//!
//! Tables are small enough to encode fully in memory before a single `put`,
//! so the writer targets any `Write` sink and [`encode_batch`] targets a
//! `Vec<u8>`.

use crate::config::ParquetSettings;
use crate::error::{Error, Result};
use arrow::datatypes::{Schema, SchemaRef};
use arrow::record_batch::RecordBatch;
use bytes::Bytes;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, ZstdLevel};
use parquet::file::properties::{EnabledStatistics, WriterProperties};
use std::io::Write;
use std::sync::Arc;

/// Rows per row group unless configured otherwise
pub const DEFAULT_ROW_GROUP_SIZE: usize = 1024 * 1024;

/// Encoding settings for table files
#[derive(Debug, Clone, PartialEq)]
pub struct ParquetWriterConfig {
    compression: Compression,
    row_group_size: usize,
    dictionary_enabled: bool,
    statistics_enabled: bool,
}

impl Default for ParquetWriterConfig {
    fn default() -> Self {
        Self {
            compression: Compression::SNAPPY,
            row_group_size: DEFAULT_ROW_GROUP_SIZE,
            dictionary_enabled: true,
            statistics_enabled: true,
        }
    }
}

impl ParquetWriterConfig {
    /// Snappy, dictionary encoding and page statistics
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the codec
    #[must_use]
    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Write files without compression
    #[must_use]
    pub fn uncompressed(self) -> Self {
        self.with_compression(Compression::UNCOMPRESSED)
    }

    /// Compress with ZSTD at its default level
    #[must_use]
    pub fn zstd(self) -> Self {
        self.with_compression(Compression::ZSTD(ZstdLevel::default()))
    }

    /// Cap the rows in each row group
    #[must_use]
    pub fn with_row_group_size(mut self, rows: usize) -> Self {
        self.row_group_size = rows.max(1);
        self
    }

    #[must_use]
    pub fn with_dictionary(mut self, enabled: bool) -> Self {
        self.dictionary_enabled = enabled;
        self
    }

    #[must_use]
    pub fn with_statistics(mut self, enabled: bool) -> Self {
        self.statistics_enabled = enabled;
        self
    }

    pub fn compression(&self) -> Compression {
        self.compression
    }

    pub fn row_group_size(&self) -> usize {
        self.row_group_size
    }

    pub fn is_dictionary_enabled(&self) -> bool {
        self.dictionary_enabled
    }

    pub fn is_statistics_enabled(&self) -> bool {
        self.statistics_enabled
    }

    /// Parquet writer properties for these settings
    pub fn properties(&self) -> WriterProperties {
        let statistics = if self.statistics_enabled {
            EnabledStatistics::Page
        } else {
            EnabledStatistics::None
        };

        WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .set_dictionary_enabled(self.dictionary_enabled)
            .set_statistics_enabled(statistics)
            .build()
    }
}

impl TryFrom<&ParquetSettings> for ParquetWriterConfig {
    type Error = Error;

    fn try_from(settings: &ParquetSettings) -> Result<Self> {
        let config = match settings.compression.to_ascii_lowercase().as_str() {
            "snappy" => Self::new(),
            "zstd" => Self::new().zstd(),
            "uncompressed" | "none" => Self::new().uncompressed(),
            other => {
                return Err(Error::invalid_value(
                    "parquet.compression",
                    format!("unknown codec '{other}'"),
                ))
            }
        };

        Ok(config
            .with_row_group_size(settings.row_group_size)
            .with_dictionary(settings.dictionary)
            .with_statistics(settings.statistics))
    }
}

/// Streams batches of one schema into a Parquet file
pub struct ParquetWriter<W: Write + Send> {
    inner: ArrowWriter<W>,
    schema: SchemaRef,
    rows_written: usize,
}

impl<W: Write + Send> ParquetWriter<W> {
    /// Start a file in `sink`
    pub fn new(sink: W, schema: &Schema, config: &ParquetWriterConfig) -> Result<Self> {
        let schema = Arc::new(schema.clone());
        let inner = ArrowWriter::try_new(sink, Arc::clone(&schema), Some(config.properties()))?;

        Ok(Self {
            inner,
            schema,
            rows_written: 0,
        })
    }

    /// Append a batch; its schema must match the file schema
    pub fn write(&mut self, batch: &RecordBatch) -> Result<()> {
        if batch.schema().fields() != self.schema.fields() {
            return Err(Error::output(format!(
                "Batch schema does not match file schema: {:?}",
                batch.schema().fields()
            )));
        }

        self.inner.write(batch)?;
        self.rows_written += batch.num_rows();
        Ok(())
    }

    /// Rows appended so far
    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    /// Write the footer and hand back the sink
    pub fn finish(self) -> Result<W> {
        Ok(self.inner.into_inner()?)
    }
}

/// Encode one batch as a complete in-memory Parquet file
pub fn encode_batch(batch: &RecordBatch, config: &ParquetWriterConfig) -> Result<Bytes> {
    let mut writer = ParquetWriter::new(Vec::new(), batch.schema().as_ref(), config)?;
    writer.write(batch)?;
    writer.finish().map(Bytes::from)
}
