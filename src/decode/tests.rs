//! Tests for decoder module

use super::*;
use crate::records::{LogRecord, SongRecord, NEXT_SONG_PAGE};
use crate::schema::{LOG_SCHEMA, SONG_SCHEMA};

const SONGS: &str = r#"{"num_songs": 1, "artist_id": "AR1", "artist_latitude": 35.14968, "artist_longitude": -90.04892, "artist_location": "Memphis, TN", "artist_name": "Elena", "song_id": "SO1", "title": "Setanta matins", "duration": 269.58322, "year": 0}
{"num_songs": 1, "artist_id": "AR2", "artist_name": "Casual", "song_id": "SO2", "title": "I Didn't Mean To", "duration": 218.93179, "year": 0}
not json at all
{"num_songs": 1, "artist_id": "AR3", "song_id": "SO3", "year": "nineteen"}

"#;

#[test]
fn test_decode_drops_malformed_lines() {
    let decoded = JsonlDecoder::new(&SONG_SCHEMA).decode(SONGS);
    assert_eq!(decoded.len(), 2);
    assert_eq!(decoded.dropped, 2);
    assert_eq!(decoded.records[0]["song_id"], "SO1");
}

#[test]
fn test_decode_empty_body() {
    let decoded = JsonlDecoder::new(&SONG_SCHEMA).decode("");
    assert!(decoded.is_empty());
    assert_eq!(decoded.dropped, 0);
}

#[test]
fn test_decode_crlf_lines() {
    let body = "{\"page\": \"NextSong\", \"ts\": 1, \"userId\": \"7\"}\r\n{\"page\": \"Home\", \"ts\": 2, \"userId\": \"7\"}\r\n";
    let decoded = JsonlDecoder::new(&LOG_SCHEMA).decode(body);
    assert_eq!(decoded.len(), 2);
}

#[test]
fn test_decode_as_song_records() {
    let decoded: Decoded<SongRecord> = JsonlDecoder::new(&SONG_SCHEMA).decode_as(SONGS);
    assert_eq!(decoded.len(), 2);
    let second = &decoded.records[1];
    assert_eq!(second.artist_name.as_deref(), Some("Casual"));
    assert_eq!(second.artist_location, None);
    assert_eq!(second.year, Some(0));
}

#[test]
fn test_decode_as_log_records() {
    let body = r#"{"artist":"Des'ree","auth":"Logged In","firstName":"Kaylee","gender":"F","itemInSession":1,"lastName":"Summers","length":246.30812,"level":"free","location":"Phoenix-Mesa-Scottsdale, AZ","method":"PUT","page":"NextSong","registration":1540344794796.0,"sessionId":139,"song":"You Gotta Be","status":200,"ts":1541106106,"userAgent":"Mozilla/5.0","userId":"8"}"#;
    let decoded: Decoded<LogRecord> = JsonlDecoder::new(&LOG_SCHEMA).decode_as(body);
    assert_eq!(decoded.len(), 1);
    let log = &decoded.records[0];
    assert_eq!(log.first_name.as_deref(), Some("Kaylee"));
    assert_eq!(log.session_id, Some(139));
    assert_eq!(log.user_id, "8");
    assert_eq!(log.ts, 1_541_106_106);
    assert_eq!(log.page, NEXT_SONG_PAGE);
}

#[test]
fn test_decoder_keeps_its_schema() {
    let decoder = JsonlDecoder::new(&SONG_SCHEMA);
    assert_eq!(decoder.schema().name(), "song");
}
