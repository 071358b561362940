//! Tests for output tables

use super::*;
use arrow::array::{Array, BooleanArray, Float32Array, Int32Array, StringArray};
use arrow::datatypes::{DataType, TimeUnit};
use chrono_tz::America::Los_Angeles;
use chrono_tz::UTC;

fn song(id: &str, duration: Option<f32>) -> SongRow {
    SongRow {
        song_id: id.to_string(),
        title: Some("Setanta matins".to_string()),
        artist_id: "AR1".to_string(),
        year: Some(0),
        duration,
    }
}

fn partition_columns_exist<T: Table>() {
    let schema = T::schema(UTC);
    for column in T::PARTITION_BY {
        assert!(
            schema.field_with_name(column).is_ok(),
            "{} is missing partition column {column}",
            T::NAME
        );
    }
}

#[test]
fn test_partition_columns_are_in_schema() {
    partition_columns_exist::<SongRow>();
    partition_columns_exist::<ArtistRow>();
    partition_columns_exist::<UserRow>();
    partition_columns_exist::<TimeRow>();
    partition_columns_exist::<SongplayRow>();
}

#[test]
fn test_table_paths() {
    assert_eq!(SongRow::PATH, "Songs/songs.parquet");
    assert_eq!(ArtistRow::PATH, "Artists/artists.parquet");
    assert_eq!(UserRow::PATH, "Users/users.parquet");
    assert_eq!(TimeRow::PATH, "Time/time.parquet");
    assert_eq!(SongplayRow::PATH, "Songplays/songplays.parquet");
}

#[test]
fn test_songs_to_batch() {
    let rows = vec![song("SO1", Some(1.5)), song("SO2", None)];
    let batch = SongRow::to_batch(&rows, UTC).unwrap();
    assert_eq!(batch.num_rows(), 2);
    assert_eq!(batch.num_columns(), 5);

    let ids = batch
        .column(0)
        .as_any()
        .downcast_ref::<StringArray>()
        .unwrap();
    assert_eq!(ids.value(1), "SO2");

    let durations = batch
        .column(4)
        .as_any()
        .downcast_ref::<Float32Array>()
        .unwrap();
    assert!((durations.value(0) - 1.5).abs() < f32::EPSILON);
    assert!(durations.is_null(1));
}

#[test]
fn test_empty_batch_keeps_schema() {
    let batch = UserRow::to_batch(&[], Los_Angeles).unwrap();
    assert_eq!(batch.num_rows(), 0);
    assert_eq!(batch.schema(), UserRow::schema(Los_Angeles));
}

#[test]
fn test_time_column_carries_session_zone() {
    let row = TimeRow {
        start_time: 1_541_990_258_000_000,
        hour: 18,
        day: 11,
        week: 45,
        month: 11,
        year: 2018,
        weekday: true,
    };

    let batch = TimeRow::to_batch(&[row], Los_Angeles).unwrap();
    assert_eq!(
        batch.schema().field(0).data_type(),
        &DataType::Timestamp(TimeUnit::Microsecond, Some("America/Los_Angeles".into()))
    );
    let hours = batch
        .column(1)
        .as_any()
        .downcast_ref::<Int32Array>()
        .unwrap();
    assert_eq!(hours.value(0), 18);
    let weekday = batch
        .column(6)
        .as_any()
        .downcast_ref::<BooleanArray>()
        .unwrap();
    assert!(weekday.value(0));

    let utc = TimeRow::to_batch(&[row], UTC).unwrap();
    assert_eq!(
        utc.schema().field(0).data_type(),
        &DataType::Timestamp(TimeUnit::Microsecond, Some("UTC".into()))
    );
}

#[test]
fn test_songplays_to_batch() {
    let row = SongplayRow {
        songplay_id: 1,
        start_time: 1_541_990_258_000_000,
        year: 2018,
        month: 11,
        user_id: "26".to_string(),
        level: Some("free".to_string()),
        song_id: "SO1".to_string(),
        artist_id: "AR1".to_string(),
        session_id: None,
        location: None,
        user_agent: None,
    };
    let batch = SongplayRow::to_batch(&[row.clone(), row], Los_Angeles).unwrap();
    assert_eq!(batch.num_rows(), 2);
    assert_eq!(batch.num_columns(), 11);
    assert_eq!(batch.column(8).null_count(), 2);
    assert_eq!(batch.schema(), SongplayRow::schema(Los_Angeles));
}
