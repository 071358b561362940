//! Row types and their Arrow conversion

use super::types::Table;
use crate::error::Result;
use arrow::array::{
    ArrayRef, BooleanArray, Float32Array, Int32Array, StringArray, TimestampMicrosecondArray,
};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef, TimeUnit};
use arrow::record_batch::RecordBatch;
use chrono_tz::Tz;
use std::sync::{Arc, LazyLock};

fn start_time_type(tz: Tz) -> DataType {
    DataType::Timestamp(TimeUnit::Microsecond, Some(tz.name().into()))
}

fn strings<'a, T: 'a>(rows: &'a [T], f: impl Fn(&'a T) -> Option<&'a str>) -> ArrayRef {
    Arc::new(rows.iter().map(f).collect::<StringArray>())
}

fn ints<T>(rows: &[T], f: impl Fn(&T) -> Option<i32>) -> ArrayRef {
    Arc::new(rows.iter().map(f).collect::<Int32Array>())
}

fn floats<T>(rows: &[T], f: impl Fn(&T) -> Option<f32>) -> ArrayRef {
    Arc::new(rows.iter().map(f).collect::<Float32Array>())
}

fn start_times<T>(rows: &[T], tz: Tz, f: impl Fn(&T) -> i64) -> ArrayRef {
    Arc::new(
        rows.iter()
            .map(|r| Some(f(r)))
            .collect::<TimestampMicrosecondArray>()
            .with_timezone(tz.name()),
    )
}

// ============================================================================
// Songs
// ============================================================================

/// Row of the songs table
#[derive(Debug, Clone, PartialEq)]
pub struct SongRow {
    pub song_id: String,
    pub title: Option<String>,
    pub artist_id: String,
    pub year: Option<i32>,
    pub duration: Option<f32>,
}

static SONGS_SCHEMA: LazyLock<SchemaRef> = LazyLock::new(|| {
    Arc::new(Schema::new(vec![
        Field::new("song_id", DataType::Utf8, false),
        Field::new("title", DataType::Utf8, true),
        Field::new("artist_id", DataType::Utf8, false),
        Field::new("year", DataType::Int32, true),
        Field::new("duration", DataType::Float32, true),
    ]))
});

impl Table for SongRow {
    const NAME: &'static str = "songs";
    const PATH: &'static str = "Songs/songs.parquet";
    const PARTITION_BY: &'static [&'static str] = &["year", "artist_id"];

    fn schema(_tz: Tz) -> SchemaRef {
        Arc::clone(&SONGS_SCHEMA)
    }

    fn to_batch(rows: &[Self], tz: Tz) -> Result<RecordBatch> {
        let columns = vec![
            strings(rows, |r| Some(r.song_id.as_str())),
            strings(rows, |r| r.title.as_deref()),
            strings(rows, |r| Some(r.artist_id.as_str())),
            ints(rows, |r| r.year),
            floats(rows, |r| r.duration),
        ];
        Ok(RecordBatch::try_new(Self::schema(tz), columns)?)
    }
}

// ============================================================================
// Artists
// ============================================================================

/// Row of the artists table
#[derive(Debug, Clone, PartialEq)]
pub struct ArtistRow {
    pub artist_id: String,
    pub name: Option<String>,
    pub location: Option<String>,
    pub latitude: Option<f32>,
    pub longitude: Option<f32>,
}

static ARTISTS_SCHEMA: LazyLock<SchemaRef> = LazyLock::new(|| {
    Arc::new(Schema::new(vec![
        Field::new("artist_id", DataType::Utf8, false),
        Field::new("name", DataType::Utf8, true),
        Field::new("location", DataType::Utf8, true),
        Field::new("latitude", DataType::Float32, true),
        Field::new("longitude", DataType::Float32, true),
    ]))
});

impl Table for ArtistRow {
    const NAME: &'static str = "artists";
    const PATH: &'static str = "Artists/artists.parquet";
    const PARTITION_BY: &'static [&'static str] = &[];

    fn schema(_tz: Tz) -> SchemaRef {
        Arc::clone(&ARTISTS_SCHEMA)
    }

    fn to_batch(rows: &[Self], tz: Tz) -> Result<RecordBatch> {
        let columns = vec![
            strings(rows, |r| Some(r.artist_id.as_str())),
            strings(rows, |r| r.name.as_deref()),
            strings(rows, |r| r.location.as_deref()),
            floats(rows, |r| r.latitude),
            floats(rows, |r| r.longitude),
        ];
        Ok(RecordBatch::try_new(Self::schema(tz), columns)?)
    }
}

// ============================================================================
// Users
// ============================================================================

/// Row of the users table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRow {
    pub user_id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub level: Option<String>,
}

static USERS_SCHEMA: LazyLock<SchemaRef> = LazyLock::new(|| {
    Arc::new(Schema::new(vec![
        Field::new("user_id", DataType::Utf8, false),
        Field::new("first_name", DataType::Utf8, true),
        Field::new("last_name", DataType::Utf8, true),
        Field::new("gender", DataType::Utf8, true),
        Field::new("level", DataType::Utf8, true),
    ]))
});

impl Table for UserRow {
    const NAME: &'static str = "users";
    const PATH: &'static str = "Users/users.parquet";
    const PARTITION_BY: &'static [&'static str] = &[];

    fn schema(_tz: Tz) -> SchemaRef {
        Arc::clone(&USERS_SCHEMA)
    }

    fn to_batch(rows: &[Self], tz: Tz) -> Result<RecordBatch> {
        let columns = vec![
            strings(rows, |r| Some(r.user_id.as_str())),
            strings(rows, |r| r.first_name.as_deref()),
            strings(rows, |r| r.last_name.as_deref()),
            strings(rows, |r| r.gender.as_deref()),
            strings(rows, |r| r.level.as_deref()),
        ];
        Ok(RecordBatch::try_new(Self::schema(tz), columns)?)
    }
}

// ============================================================================
// Time
// ============================================================================

/// Row of the time table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRow {
    /// Event instant in microseconds since the epoch
    pub start_time: i64,
    pub hour: i32,
    pub day: i32,
    pub week: i32,
    pub month: i32,
    pub year: i32,
    pub weekday: bool,
}

fn time_schema(tz: Tz) -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new("start_time", start_time_type(tz), false),
        Field::new("hour", DataType::Int32, false),
        Field::new("day", DataType::Int32, false),
        Field::new("week", DataType::Int32, false),
        Field::new("month", DataType::Int32, false),
        Field::new("year", DataType::Int32, false),
        Field::new("weekday", DataType::Boolean, false),
    ]))
}

impl Table for TimeRow {
    const NAME: &'static str = "time";
    const PATH: &'static str = "Time/time.parquet";
    const PARTITION_BY: &'static [&'static str] = &["year", "month"];

    fn schema(tz: Tz) -> SchemaRef {
        time_schema(tz)
    }

    fn to_batch(rows: &[Self], tz: Tz) -> Result<RecordBatch> {
        let columns = vec![
            start_times(rows, tz, |r| r.start_time),
            ints(rows, |r| Some(r.hour)),
            ints(rows, |r| Some(r.day)),
            ints(rows, |r| Some(r.week)),
            ints(rows, |r| Some(r.month)),
            ints(rows, |r| Some(r.year)),
            Arc::new(rows.iter().map(|r| Some(r.weekday)).collect::<BooleanArray>()),
        ];
        Ok(RecordBatch::try_new(Self::schema(tz), columns)?)
    }
}

// ============================================================================
// Songplays
// ============================================================================

/// Row of the songplays fact table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongplayRow {
    /// Rank of this play among plays of the same song, by start time
    pub songplay_id: i32,
    /// Event instant in microseconds since the epoch
    pub start_time: i64,
    pub year: i32,
    pub month: i32,
    pub user_id: String,
    pub level: Option<String>,
    pub song_id: String,
    pub artist_id: String,
    pub session_id: Option<i32>,
    pub location: Option<String>,
    pub user_agent: Option<String>,
}

fn songplays_schema(tz: Tz) -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new("songplay_id", DataType::Int32, false),
        Field::new("start_time", start_time_type(tz), false),
        Field::new("year", DataType::Int32, false),
        Field::new("month", DataType::Int32, false),
        Field::new("user_id", DataType::Utf8, false),
        Field::new("level", DataType::Utf8, true),
        Field::new("song_id", DataType::Utf8, false),
        Field::new("artist_id", DataType::Utf8, false),
        Field::new("session_id", DataType::Int32, true),
        Field::new("location", DataType::Utf8, true),
        Field::new("user_agent", DataType::Utf8, true),
    ]))
}

impl Table for SongplayRow {
    const NAME: &'static str = "songplays";
    const PATH: &'static str = "Songplays/songplays.parquet";
    const PARTITION_BY: &'static [&'static str] = &["year", "month"];

    fn schema(tz: Tz) -> SchemaRef {
        songplays_schema(tz)
    }

    fn to_batch(rows: &[Self], tz: Tz) -> Result<RecordBatch> {
        let columns = vec![
            ints(rows, |r| Some(r.songplay_id)),
            start_times(rows, tz, |r| r.start_time),
            ints(rows, |r| Some(r.year)),
            ints(rows, |r| Some(r.month)),
            strings(rows, |r| Some(r.user_id.as_str())),
            strings(rows, |r| r.level.as_deref()),
            strings(rows, |r| Some(r.song_id.as_str())),
            strings(rows, |r| Some(r.artist_id.as_str())),
            ints(rows, |r| r.session_id),
            strings(rows, |r| r.location.as_deref()),
            strings(rows, |r| r.user_agent.as_deref()),
        ];
        Ok(RecordBatch::try_new(Self::schema(tz), columns)?)
    }
}
