//! Event normalization
//!
//! Only `NextSong` events are used. Users and time are distinct projections
//! of those events; songplays joins them against the raw catalog on the
//! exact `(artist name, song title)` pair.

use crate::database::QueryEngine;
use crate::error::Result;
use crate::records::{LogRecord, SongRecord};
use crate::tables::{SongplayRow, TimeRow, UserRow};
use chrono_tz::Tz;
use duckdb::Row;
use tracing::debug;

const USERS_QUERY: &str = "
SELECT DISTINCT user_id, first_name, last_name, gender, level
FROM song_plays
ORDER BY ALL
";

const TIME_QUERY: &str = "
SELECT DISTINCT start_time, hour, day, week, month, year, weekday
FROM song_plays
WHERE start_time IS NOT NULL
ORDER BY ALL
";

// Ties on start_time within a song rank in input order.
const SONGPLAYS_QUERY: &str = "
SELECT DISTINCT
    CAST(row_number() OVER (
        PARTITION BY s.song_id
        ORDER BY p.start_time, p._row, s._row
    ) AS INTEGER) AS songplay_id,
    p.start_time,
    p.year,
    p.month,
    p.user_id,
    p.level,
    s.song_id,
    s.artist_id,
    p.session_id,
    p.location,
    p.user_agent
FROM song_plays p
JOIN song_records s ON p.artist = s.artist_name AND p.song = s.title
WHERE p.start_time IS NOT NULL
ORDER BY start_time DESC, song_id, songplay_id
";

/// The tables built from the activity log
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventTables {
    pub users: Vec<UserRow>,
    pub time: Vec<TimeRow>,
    pub songplays: Vec<SongplayRow>,
}

fn user_row(row: &Row<'_>) -> duckdb::Result<UserRow> {
    Ok(UserRow {
        user_id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        gender: row.get(3)?,
        level: row.get(4)?,
    })
}

fn time_row(row: &Row<'_>) -> duckdb::Result<TimeRow> {
    Ok(TimeRow {
        start_time: row.get(0)?,
        hour: row.get(1)?,
        day: row.get(2)?,
        week: row.get(3)?,
        month: row.get(4)?,
        year: row.get(5)?,
        weekday: row.get(6)?,
    })
}

fn songplay_row(row: &Row<'_>) -> duckdb::Result<SongplayRow> {
    Ok(SongplayRow {
        songplay_id: row.get(0)?,
        start_time: row.get(1)?,
        year: row.get(2)?,
        month: row.get(3)?,
        user_id: row.get(4)?,
        level: row.get(5)?,
        song_id: row.get(6)?,
        artist_id: row.get(7)?,
        session_id: row.get(8)?,
        location: row.get(9)?,
        user_agent: row.get(10)?,
    })
}

/// Users table; a level change yields a second row for the same user
pub fn build_users(engine: &QueryEngine) -> Result<Vec<UserRow>> {
    engine.query(USERS_QUERY, user_row)
}

/// Time table, one row per distinct event instant
pub fn build_time(engine: &QueryEngine) -> Result<Vec<TimeRow>> {
    engine.query(TIME_QUERY, time_row)
}

/// Songplays fact table, latest plays first
///
/// `songplay_id` is the play's rank among plays of the same song ordered by
/// start time, so ids repeat across songs.
pub fn build_songplays(engine: &QueryEngine) -> Result<Vec<SongplayRow>> {
    engine.query(SONGPLAYS_QUERY, songplay_row)
}

/// Build all event tables from raw log records and the raw catalog
pub fn normalize_events(logs: &[LogRecord], catalog: &[SongRecord], tz: Tz) -> Result<EventTables> {
    let engine = QueryEngine::new()?;
    engine.load_logs(logs, tz)?;
    engine.load_songs(catalog)?;
    debug!(
        "{} of {} log events are song plays",
        engine.count("song_plays")?,
        logs.len()
    );

    Ok(EventTables {
        users: build_users(&engine)?,
        time: build_time(&engine)?,
        songplays: build_songplays(&engine)?,
    })
}
