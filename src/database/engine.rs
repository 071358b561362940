//! In-memory DuckDB engine over raw records
//!
//! Raw records are appended to two tables, `song_records` and `log_records`,
//! and every output table is a query over them. Each raw table carries a
//! `_row` column holding input order, used to break ties.

use crate::error::{Error, Result};
use crate::records::{LogRecord, SongRecord, NEXT_SONG_PAGE};
use crate::time::TimeParts;
use chrono_tz::Tz;
use duckdb::{params, Connection, Row};
use tracing::debug;

const CREATE_TABLES: &str = "
CREATE TABLE song_records (
    _row BIGINT NOT NULL,
    song_id VARCHAR NOT NULL,
    title VARCHAR,
    artist_id VARCHAR NOT NULL,
    artist_name VARCHAR,
    artist_location VARCHAR,
    artist_latitude FLOAT,
    artist_longitude FLOAT,
    year INTEGER,
    duration FLOAT
);

CREATE TABLE log_records (
    _row BIGINT NOT NULL,
    page VARCHAR NOT NULL,
    user_id VARCHAR NOT NULL,
    first_name VARCHAR,
    last_name VARCHAR,
    gender VARCHAR,
    level VARCHAR,
    artist VARCHAR,
    song VARCHAR,
    session_id INTEGER,
    location VARCHAR,
    user_agent VARCHAR,
    ts BIGINT NOT NULL,
    start_time BIGINT,
    hour INTEGER,
    day INTEGER,
    week INTEGER,
    month INTEGER,
    year INTEGER,
    weekday BOOLEAN
);
";

/// DuckDB connection holding one run's raw records
pub struct QueryEngine {
    conn: Connection,
}

impl QueryEngine {
    /// Open an in-memory database with empty raw tables
    pub fn new() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| Error::query(format!("Failed to create DuckDB connection: {e}")))?;

        conn.execute_batch(CREATE_TABLES)
            .map_err(|e| Error::query(format!("Failed to create raw tables: {e}")))?;

        // song plays are the only events any table is built from
        conn.execute_batch(&format!(
            "CREATE VIEW song_plays AS SELECT * FROM log_records WHERE page = '{NEXT_SONG_PAGE}';"
        ))
        .map_err(|e| Error::query(format!("Failed to create song_plays view: {e}")))?;

        Ok(Self { conn })
    }

    /// Append song catalog records to `song_records`
    pub fn load_songs(&self, records: &[SongRecord]) -> Result<()> {
        let mut appender = self
            .conn
            .appender("song_records")
            .map_err(|e| Error::query(format!("Failed to open song_records appender: {e}")))?;

        for (row, record) in records.iter().enumerate() {
            let row = row as i64;
            appender
                .append_row(params![
                    row,
                    record.song_id,
                    record.title,
                    record.artist_id,
                    record.artist_name,
                    record.artist_location,
                    record.artist_latitude,
                    record.artist_longitude,
                    record.year,
                    record.duration
                ])
                .map_err(|e| Error::query(format!("Failed to append song record: {e}")))?;
        }

        appender
            .flush()
            .map_err(|e| Error::query(format!("Failed to flush song records: {e}")))?;
        debug!("Loaded {} rows into song_records", records.len());
        Ok(())
    }

    /// Append log records to `log_records`
    ///
    /// Calendar parts are derived here in the session zone. Timestamps that
    /// cannot be represented leave them null.
    pub fn load_logs(&self, records: &[LogRecord], tz: Tz) -> Result<()> {
        let mut appender = self
            .conn
            .appender("log_records")
            .map_err(|e| Error::query(format!("Failed to open log_records appender: {e}")))?;

        for (row, record) in records.iter().enumerate() {
            let row = row as i64;
            let parts = TimeParts::derive(record.ts, tz);
            let start_time = parts.map(|p| p.micros());
            let hour = parts.map(|p| p.hour);
            let day = parts.map(|p| p.day);
            let week = parts.map(|p| p.week);
            let month = parts.map(|p| p.month);
            let year = parts.map(|p| p.year);
            let weekday = parts.map(|p| p.weekday);

            appender
                .append_row(params![
                    row,
                    record.page,
                    record.user_id,
                    record.first_name,
                    record.last_name,
                    record.gender,
                    record.level,
                    record.artist,
                    record.song,
                    record.session_id,
                    record.location,
                    record.user_agent,
                    record.ts,
                    start_time,
                    hour,
                    day,
                    week,
                    month,
                    year,
                    weekday
                ])
                .map_err(|e| Error::query(format!("Failed to append log record: {e}")))?;
        }

        appender
            .flush()
            .map_err(|e| Error::query(format!("Failed to flush log records: {e}")))?;
        debug!("Loaded {} rows into log_records", records.len());
        Ok(())
    }

    /// Run a query and map every result row
    pub fn query<T, F>(&self, query: &str, map: F) -> Result<Vec<T>>
    where
        F: FnMut(&Row<'_>) -> duckdb::Result<T>,
    {
        debug!("Executing query: {}", query);

        let mut stmt = self
            .conn
            .prepare(query)
            .map_err(|e| Error::query(format!("Failed to prepare query: {e}")))?;

        let rows = stmt
            .query_map([], map)
            .map_err(|e| Error::query(format!("Failed to execute query: {e}")))?
            .collect::<duckdb::Result<Vec<T>>>()
            .map_err(|e| Error::query(format!("Failed to read query results: {e}")))?;

        Ok(rows)
    }

    /// Count rows of a table or view
    pub fn count(&self, table: &str) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
            .map_err(|e| Error::query(format!("Failed to count {table}: {e}")))?;
        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::America::Los_Angeles;

    fn log(page: &str, ts: i64) -> LogRecord {
        LogRecord {
            artist: None,
            auth: None,
            first_name: None,
            gender: None,
            item_in_session: None,
            last_name: None,
            length: None,
            level: None,
            location: None,
            method: None,
            page: page.to_string(),
            registration: None,
            session_id: None,
            song: None,
            status: None,
            ts,
            user_agent: None,
            user_id: "1".to_string(),
        }
    }

    #[test]
    fn test_song_plays_view_filters_pages() {
        let engine = QueryEngine::new().unwrap();
        engine
            .load_logs(
                &[log("NextSong", 1), log("Home", 2), log("nextsong", 3)],
                Los_Angeles,
            )
            .unwrap();
        assert_eq!(engine.count("log_records").unwrap(), 3);
        assert_eq!(engine.count("song_plays").unwrap(), 1);
    }

    #[test]
    fn test_logs_carry_calendar_parts() {
        let engine = QueryEngine::new().unwrap();
        engine
            .load_logs(&[log("NextSong", 1_541_990_258), log("NextSong", i64::MAX)], Los_Angeles)
            .unwrap();

        let parts: Vec<(i64, Option<i64>, Option<i32>, Option<bool>)> = engine
            .query(
                "SELECT _row, start_time, hour, weekday FROM log_records ORDER BY _row",
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
            )
            .unwrap();
        assert_eq!(
            parts,
            vec![
                (0, Some(1_541_990_258_000_000), Some(18), Some(true)),
                (1, None, None, None),
            ]
        );
    }

    #[test]
    fn test_query_error_is_reported() {
        let engine = QueryEngine::new().unwrap();
        let err = engine
            .query("SELECT missing FROM song_records", |row| row.get::<_, String>(0))
            .unwrap_err();
        assert!(matches!(err, Error::Query { .. }));
        assert!(!err.is_config());
    }
}
