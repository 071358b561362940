//! Schema conformance tests

use super::*;
use serde_json::{json, Value};
use test_case::test_case;

fn song() -> Value {
    json!({
        "num_songs": 1,
        "artist_id": "ARJIE2Y1187B994AB7",
        "artist_latitude": null,
        "artist_longitude": null,
        "artist_location": "",
        "artist_name": "Line Renaud",
        "song_id": "SOUPIRU12A6D4FA1E1",
        "title": "Der Kleine Dompfaff",
        "duration": 152.92036,
        "year": 0
    })
}

#[test]
fn test_field_counts() {
    assert_eq!(SONG_SCHEMA.fields().len(), 10);
    assert_eq!(LOG_SCHEMA.fields().len(), 18);
}

#[test]
fn test_required_fields() {
    let required = |schema: &RecordSchema| -> Vec<&str> {
        schema
            .fields()
            .iter()
            .filter(|f| f.required)
            .map(|f| f.name)
            .collect()
    };
    assert_eq!(required(&SONG_SCHEMA), vec!["artist_id", "song_id"]);
    assert_eq!(required(&LOG_SCHEMA), vec!["page", "ts", "userId"]);
    assert_eq!(SONG_SCHEMA.name(), "song");
    assert_eq!(LOG_SCHEMA.name(), "log");
}

#[test]
fn test_conform_valid_song() {
    let conformed = SONG_SCHEMA.conform(song()).unwrap();
    assert_eq!(conformed.len(), 10);
    assert_eq!(conformed["title"], "Der Kleine Dompfaff");
    assert_eq!(conformed["artist_latitude"], Value::Null);
}

#[test]
fn test_conform_fills_missing_optional_and_drops_extra() {
    let mut record = song();
    let obj = record.as_object_mut().unwrap();
    obj.remove("duration");
    obj.insert("unexpected".to_string(), json!("ignored"));

    let conformed = SONG_SCHEMA.conform(record).unwrap();
    assert_eq!(conformed["duration"], Value::Null);
    assert!(!conformed.contains_key("unexpected"));
}

#[test_case("song_id" ; "missing song id")]
#[test_case("artist_id" ; "missing artist id")]
fn test_conform_missing_required(field: &str) {
    let mut record = song();
    record.as_object_mut().unwrap().remove(field);
    assert!(SONG_SCHEMA.conform(record).is_none());
}

#[test]
fn test_conform_null_required() {
    let mut record = song();
    record["song_id"] = Value::Null;
    assert!(SONG_SCHEMA.conform(record).is_none());
}

#[test_case("year", json!("1999") ; "string for int")]
#[test_case("year", json!(1999.5) ; "fraction for int")]
#[test_case("year", json!(3_000_000_000_i64) ; "int out of i32 range")]
#[test_case("duration", json!("long") ; "string for float")]
#[test_case("duration", json!(true) ; "bool for float")]
#[test_case("title", json!(["a", "b"]) ; "array for string")]
#[test_case("title", json!({"a": 1}) ; "object for string")]
fn test_conform_type_mismatch(field: &str, value: Value) {
    let mut record = song();
    record[field] = value;
    assert!(SONG_SCHEMA.conform(record).is_none());
}

#[test]
fn test_conform_integer_accepted_as_float() {
    let mut record = song();
    record["duration"] = json!(200);
    assert!(SONG_SCHEMA.conform(record).is_some());
}

#[test]
fn test_conform_scalar_rendered_as_string() {
    let record = json!({"page": "NextSong", "ts": 1_541_990_258_i64, "userId": 26});
    let conformed = LOG_SCHEMA.conform(record).unwrap();
    assert_eq!(conformed["userId"], "26");
}

#[test]
fn test_conform_rejects_non_object() {
    assert!(LOG_SCHEMA.conform(json!([1, 2, 3])).is_none());
    assert!(LOG_SCHEMA.conform(json!("NextSong")).is_none());
}

#[test]
fn test_ts_must_be_integral() {
    let record = json!({"page": "NextSong", "ts": 1_541_990_258.5, "userId": "26"});
    assert!(LOG_SCHEMA.conform(record).is_none());
}
