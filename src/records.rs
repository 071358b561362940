//! Typed raw records
//!
//! Deserialized from maps that already passed schema conformance, so every
//! declared field is present (possibly null) with the right JSON type.

use serde::{Deserialize, Serialize};

/// Page value that marks a song play in the activity log
pub const NEXT_SONG_PAGE: &str = "NextSong";

/// One song catalog record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SongRecord {
    pub num_songs: Option<i32>,
    pub artist_id: String,
    pub artist_latitude: Option<f32>,
    pub artist_longitude: Option<f32>,
    pub artist_location: Option<String>,
    pub artist_name: Option<String>,
    pub song_id: String,
    pub title: Option<String>,
    pub duration: Option<f32>,
    pub year: Option<i32>,
}

/// One activity log record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRecord {
    pub artist: Option<String>,
    pub auth: Option<String>,
    pub first_name: Option<String>,
    pub gender: Option<String>,
    pub item_in_session: Option<i32>,
    pub last_name: Option<String>,
    pub length: Option<f32>,
    pub level: Option<String>,
    pub location: Option<String>,
    pub method: Option<String>,
    pub page: String,
    pub registration: Option<f32>,
    pub session_id: Option<i32>,
    pub song: Option<String>,
    pub status: Option<i32>,
    /// Epoch seconds
    pub ts: i64,
    pub user_agent: Option<String>,
    pub user_id: String,
}
