//! Output module
//!
//! Encodes Arrow RecordBatches as Parquet and writes them as Hive-partitioned
//! tables.
//!
//! # Overview
//!
//! This module provides:
//! - Parquet encoding with configurable compression
//! - Splitting a batch into `col=value` partition groups
//! - Overwrite-mode table writes to any [`StorageLocation`](crate::storage::StorageLocation)

mod partition;
mod table;
mod writer;

pub use partition::{
    escape_partition_value, partition_batch, PartitionGroup, DEFAULT_PARTITION_NAME,
};
pub use table::{TableWriter, WriteSummary, DATA_FILE_NAME, SUCCESS_MARKER};
pub use writer::{encode_batch, ParquetWriter, ParquetWriterConfig, DEFAULT_ROW_GROUP_SIZE};
