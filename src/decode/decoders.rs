//! Decoder implementations

use super::types::Decoded;
use crate::schema::RecordSchema;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

// ============================================================================
// JSONL Decoder
// ============================================================================

/// JSON Lines decoder that drops malformed records
#[derive(Debug, Clone, Copy)]
pub struct JsonlDecoder {
    schema: &'static RecordSchema,
}

impl JsonlDecoder {
    /// Create a decoder for the given schema
    pub fn new(schema: &'static RecordSchema) -> Self {
        Self { schema }
    }

    /// Schema records are conformed to
    pub fn schema(&self) -> &'static RecordSchema {
        self.schema
    }

    /// Decode a body into conformed JSON objects
    pub fn decode(&self, body: &str) -> Decoded<Map<String, Value>> {
        let mut out = Decoded::new();

        for line in body.split('\n') {
            if line.trim().is_empty() {
                continue;
            }

            let conformed = serde_json::from_str::<Value>(line)
                .ok()
                .and_then(|value| self.schema.conform(value));

            match conformed {
                Some(record) => out.records.push(record),
                None => out.dropped += 1,
            }
        }

        out
    }

    /// Decode a body straight into typed records
    pub fn decode_as<T: DeserializeOwned>(&self, body: &str) -> Decoded<T> {
        let conformed = self.decode(body);
        let mut out = Decoded {
            records: Vec::with_capacity(conformed.records.len()),
            dropped: conformed.dropped,
        };

        for record in conformed.records {
            match serde_json::from_value::<T>(Value::Object(record)) {
                Ok(typed) => out.records.push(typed),
                Err(_) => out.dropped += 1,
            }
        }

        out
    }
}
