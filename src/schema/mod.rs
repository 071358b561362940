//! Raw record schemas
//!
//! Fixed layouts for the two raw inputs and the conformance check that
//! decides whether a parsed JSON line is kept or dropped.
//!
//! # Overview
//!
//! - [`SONG_SCHEMA`] - ten-field song catalog record
//! - [`LOG_SCHEMA`] - eighteen-field activity log record
//! - [`RecordSchema::conform`] - type-check and normalize one record

mod conform;
mod types;

pub use types::{FieldSpec, FieldType, RecordSchema, LOG_SCHEMA, SONG_SCHEMA};

#[cfg(test)]
mod tests;
