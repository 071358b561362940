//! Hive-style partitioning
//!
//! A batch is split into one group per distinct combination of partition
//! column values. Partition columns are removed from each group's batch; their
//! values live in the directory name instead.

use crate::error::Result;
use arrow::array::{Array, UInt32Array};
use arrow::compute::take_record_batch;
use arrow::record_batch::RecordBatch;
use arrow::util::display::array_value_to_string;
use std::collections::BTreeMap;
use std::fmt::Write;

/// Directory value used for null and empty partition values
pub const DEFAULT_PARTITION_NAME: &str = "__HIVE_DEFAULT_PARTITION__";

/// Rows sharing one set of partition values
#[derive(Debug, Clone)]
pub struct PartitionGroup {
    /// Relative directory, e.g. `year=2018/month=11`; empty when unpartitioned
    pub dir: String,
    /// Rows of the group without the partition columns
    pub batch: RecordBatch,
}

/// Split a batch by partition columns
///
/// Groups come back ordered by their partition values. With no partition
/// columns the whole batch is one group, even when it has no rows; with
/// partition columns an empty batch yields no groups.
pub fn partition_batch(batch: &RecordBatch, partition_by: &[&str]) -> Result<Vec<PartitionGroup>> {
    if partition_by.is_empty() {
        return Ok(vec![PartitionGroup {
            dir: String::new(),
            batch: batch.clone(),
        }]);
    }

    let schema = batch.schema();
    let key_columns = partition_by
        .iter()
        .map(|name| schema.index_of(name))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    let data_columns: Vec<usize> = (0..schema.fields().len())
        .filter(|i| !key_columns.contains(i))
        .collect();

    let mut groups: BTreeMap<Vec<Option<String>>, Vec<u32>> = BTreeMap::new();
    for row in 0..batch.num_rows() {
        let mut key = Vec::with_capacity(key_columns.len());
        for &col in &key_columns {
            let column = batch.column(col);
            key.push(if column.is_null(row) {
                None
            } else {
                Some(array_value_to_string(column, row)?)
            });
        }
        groups.entry(key).or_default().push(row as u32);
    }

    let mut out = Vec::with_capacity(groups.len());
    for (key, rows) in groups {
        let taken = take_record_batch(batch, &UInt32Array::from(rows))?;
        out.push(PartitionGroup {
            dir: partition_dir(partition_by, &key),
            batch: taken.project(&data_columns)?,
        });
    }
    Ok(out)
}

fn partition_dir(names: &[&str], values: &[Option<String>]) -> String {
    names
        .iter()
        .zip(values)
        .map(|(name, value)| {
            let value = match value.as_deref() {
                None | Some("") => DEFAULT_PARTITION_NAME.to_string(),
                Some(v) => escape_partition_value(v),
            };
            format!("{name}={value}")
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Percent-escape characters that are unsafe in a partition directory name
pub fn escape_partition_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if needs_escape(c) {
            // every escaped char is ASCII
            let _ = write!(out, "%{:02X}", c as u32);
        } else {
            out.push(c);
        }
    }
    out
}

fn needs_escape(c: char) -> bool {
    matches!(
        c,
        '\u{01}'..='\u{1F}'
            | '"'
            | '#'
            | '%'
            | '\''
            | '*'
            | '/'
            | ':'
            | '='
            | '?'
            | '\\'
            | '\u{7F}'
            | '{'
            | '['
            | ']'
            | '^'
    )
}
