//! Record conformance
//!
//! A record either fits its schema exactly or is dropped. There is no repair
//! step and no error: callers only see `None`.

use super::types::{FieldSpec, FieldType, RecordSchema};
use serde_json::{Map, Value};

impl RecordSchema {
    /// Check a parsed record against the schema
    ///
    /// Returns a map holding exactly the declared fields (missing optional
    /// fields set to null, strings normalized), or `None` when the record is
    /// malformed.
    pub fn conform(&self, record: Value) -> Option<Map<String, Value>> {
        let Value::Object(mut obj) = record else {
            return None;
        };

        let mut out = Map::with_capacity(self.fields().len());
        for spec in self.fields() {
            let value = obj.remove(spec.name).unwrap_or(Value::Null);
            out.insert(spec.name.to_string(), conform_value(spec, value)?);
        }
        Some(out)
    }
}

fn conform_value(spec: &FieldSpec, value: Value) -> Option<Value> {
    if value.is_null() {
        return if spec.required { None } else { Some(Value::Null) };
    }

    match spec.field_type {
        FieldType::Int32 => value
            .as_i64()
            .filter(|n| i32::try_from(*n).is_ok())
            .map(|_| value),
        FieldType::Int64 => value.as_i64().map(|_| value),
        FieldType::Float32 => value.is_number().then_some(value),
        FieldType::Utf8 => match value {
            Value::String(_) => Some(value),
            // non-string scalars are kept as their JSON text
            Value::Number(_) | Value::Bool(_) => Some(Value::String(value.to_string())),
            _ => None,
        },
    }
}
