//! Table trait

use crate::error::Result;
use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;
use chrono_tz::Tz;

/// A row type that is written as one output table
pub trait Table: Sized {
    /// Short table name used in logs
    const NAME: &'static str;

    /// Location of the table relative to the output root
    const PATH: &'static str;

    /// Partition columns, outermost first
    const PARTITION_BY: &'static [&'static str];

    /// Arrow schema of the full table, partition columns included
    ///
    /// Timestamp columns carry `tz`, the session zone.
    fn schema(tz: Tz) -> SchemaRef;

    /// Convert rows into a single batch
    fn to_batch(rows: &[Self], tz: Tz) -> Result<RecordBatch>;
}
