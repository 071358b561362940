//! Pipeline orchestration
//!
//! Reads raw records from the input root, runs the catalog and event
//! normalizers, and writes their tables under the output root.
//!
//! # Overview
//!
//! - `Pipeline` - Owns the input location, the table writer and the session zone
//! - `Stage` - Which normalizers to run
//! - `RunStats` - Counters for one run

mod types;

pub use types::{RunStats, Stage};

use crate::catalog::normalize_catalog;
use crate::config::PipelineConfig;
use crate::decode::JsonlDecoder;
use crate::error::Result;
use crate::events::normalize_events;
use crate::output::{ParquetWriterConfig, TableWriter};
use crate::records::{LogRecord, SongRecord};
use crate::schema::{RecordSchema, LOG_SCHEMA, SONG_SCHEMA};
use crate::storage::StorageLocation;
use chrono_tz::Tz;
use serde::de::DeserializeOwned;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Song catalog files, relative to the input root
pub const SONG_DATA_GLOB: &str = "song_data/A/*/*/*.json";

/// Activity log files, relative to the input root
pub const LOG_DATA_GLOB: &str = "log_data/*/*/*.json";

/// One configured ETL run
#[derive(Debug)]
pub struct Pipeline {
    /// Raw data root
    input: StorageLocation,
    /// Writer over the output root
    writer: TableWriter,
    /// Session time zone
    tz: Tz,
    /// Statistics
    stats: RunStats,
}

impl Pipeline {
    /// Create a pipeline over already opened locations
    pub fn new(input: StorageLocation, output: StorageLocation, tz: Tz) -> Self {
        Self::with_writer(input, TableWriter::new(output, tz), tz)
    }

    fn with_writer(input: StorageLocation, writer: TableWriter, tz: Tz) -> Self {
        Self {
            input,
            writer,
            tz,
            stats: RunStats::default(),
        }
    }

    /// Open the configured locations
    pub fn from_config(config: &PipelineConfig) -> Result<Self> {
        let tz = config.tz()?;
        let parquet = ParquetWriterConfig::try_from(&config.parquet)?;
        let input = StorageLocation::open_input(&config.input, &config.credentials)?;
        let output = StorageLocation::open_output(&config.output, &config.credentials)?;
        debug!("Opened input {} and output {}", input.url(""), output.url(""));

        let writer = TableWriter::with_config(output, tz, parquet);
        Ok(Self::with_writer(input, writer, tz))
    }

    /// Get statistics
    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    /// Session time zone
    pub fn tz(&self) -> Tz {
        self.tz
    }

    /// Load every raw song record
    pub async fn load_songs(&mut self) -> Result<Vec<SongRecord>> {
        self.load(SONG_DATA_GLOB, &SONG_SCHEMA).await
    }

    /// Load every raw log record
    pub async fn load_logs(&mut self) -> Result<Vec<LogRecord>> {
        self.load(LOG_DATA_GLOB, &LOG_SCHEMA).await
    }

    async fn load<T: DeserializeOwned>(
        &mut self,
        pattern: &str,
        schema: &'static RecordSchema,
    ) -> Result<Vec<T>> {
        let files = self.input.list_matching(pattern).await?;
        if files.is_empty() {
            warn!("No files match {}", self.input.url(pattern));
        }

        let decoder = JsonlDecoder::new(schema);
        let mut records = Vec::new();
        for file in &files {
            let body = self.input.read(file).await?;
            let decoded = decoder.decode_as::<T>(&String::from_utf8_lossy(&body));
            debug!(
                kept = decoded.len(),
                dropped = decoded.dropped,
                "Decoded {}",
                self.input.url(file)
            );
            self.stats.add_file(decoded.len(), decoded.dropped);
            records.extend(decoded.records);
        }

        info!(
            "Loaded {} {} records from {} files",
            records.len(),
            decoder.schema().name(),
            files.len()
        );
        Ok(records)
    }

    /// Build and write the songs and artists tables
    pub async fn run_catalog(&mut self) -> Result<()> {
        let songs = self.load_songs().await?;
        let tables = normalize_catalog(&songs)?;

        let summary = self.writer.write(&tables.songs).await?;
        self.stats.add_table(summary);
        let summary = self.writer.write(&tables.artists).await?;
        self.stats.add_table(summary);
        Ok(())
    }

    /// Build and write the users, time and songplays tables
    ///
    /// The catalog is read again for the join, so this stage does not depend
    /// on the catalog stage having run.
    pub async fn run_events(&mut self) -> Result<()> {
        let logs = self.load_logs().await?;
        let catalog = self.load_songs().await?;
        let tables = normalize_events(&logs, &catalog, self.tz)?;

        let summary = self.writer.write(&tables.users).await?;
        self.stats.add_table(summary);
        let summary = self.writer.write(&tables.time).await?;
        self.stats.add_table(summary);
        let summary = self.writer.write(&tables.songplays).await?;
        self.stats.add_table(summary);
        Ok(())
    }

    /// Run the requested stages, returning the run's statistics
    pub async fn run(&mut self, stage: Stage) -> Result<RunStats> {
        let start = Instant::now();
        self.stats = RunStats::new();
        info!(
            compression = %self.writer.config().compression(),
            "Starting {stage} run into {}",
            self.writer.location().url("")
        );

        if stage.includes_catalog() {
            self.run_catalog().await?;
        }
        if stage.includes_events() {
            self.run_events().await?;
        }

        self.stats.set_duration(start.elapsed().as_millis() as u64);
        info!(
            tables = self.stats.tables.len(),
            rows = self.stats.rows_written(),
            dropped = self.stats.records_dropped,
            "Finished {stage} run in {}ms",
            self.stats.duration_ms
        );
        Ok(self.stats.clone())
    }
}
