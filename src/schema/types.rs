//! Schema types

/// Declared type of a raw field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// 32-bit signed integer
    Int32,
    /// 64-bit signed integer
    Int64,
    /// 32-bit float
    Float32,
    /// UTF-8 string
    Utf8,
}

/// A single declared field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Field name as it appears in the raw JSON
    pub name: &'static str,
    /// Declared type
    pub field_type: FieldType,
    /// Records missing this field (or holding null) are dropped
    pub required: bool,
}

impl FieldSpec {
    /// Optional field
    pub const fn optional(name: &'static str, field_type: FieldType) -> Self {
        Self {
            name,
            field_type,
            required: false,
        }
    }

    /// Required field
    pub const fn required(name: &'static str, field_type: FieldType) -> Self {
        Self {
            name,
            field_type,
            required: true,
        }
    }
}

/// Fixed schema of a raw input record
#[derive(Debug, Clone, Copy)]
pub struct RecordSchema {
    name: &'static str,
    fields: &'static [FieldSpec],
}

impl RecordSchema {
    /// Create a schema from a static field list
    pub const fn new(name: &'static str, fields: &'static [FieldSpec]) -> Self {
        Self { name, fields }
    }

    /// Schema name (used in log lines)
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Declared fields in order
    pub fn fields(&self) -> &'static [FieldSpec] {
        self.fields
    }
}

use FieldType::{Float32, Int32, Int64, Utf8};

/// Song catalog record
pub static SONG_SCHEMA: RecordSchema = RecordSchema::new(
    "song",
    &[
        FieldSpec::optional("num_songs", Int32),
        FieldSpec::required("artist_id", Utf8),
        FieldSpec::optional("artist_latitude", Float32),
        FieldSpec::optional("artist_longitude", Float32),
        FieldSpec::optional("artist_location", Utf8),
        FieldSpec::optional("artist_name", Utf8),
        FieldSpec::required("song_id", Utf8),
        FieldSpec::optional("title", Utf8),
        FieldSpec::optional("duration", Float32),
        FieldSpec::optional("year", Int32),
    ],
);

/// Activity log record
pub static LOG_SCHEMA: RecordSchema = RecordSchema::new(
    "log",
    &[
        FieldSpec::optional("artist", Utf8),
        FieldSpec::optional("auth", Utf8),
        FieldSpec::optional("firstName", Utf8),
        FieldSpec::optional("gender", Utf8),
        FieldSpec::optional("itemInSession", Int32),
        FieldSpec::optional("lastName", Utf8),
        FieldSpec::optional("length", Float32),
        FieldSpec::optional("level", Utf8),
        FieldSpec::optional("location", Utf8),
        FieldSpec::optional("method", Utf8),
        FieldSpec::required("page", Utf8),
        FieldSpec::optional("registration", Float32),
        FieldSpec::optional("sessionId", Int32),
        FieldSpec::optional("song", Utf8),
        FieldSpec::optional("status", Int32),
        FieldSpec::required("ts", Int64),
        FieldSpec::optional("userAgent", Utf8),
        FieldSpec::required("userId", Utf8),
    ],
);
