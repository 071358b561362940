//! Catalog normalization
//!
//! Songs and artists are both distinct projections of the same raw song
//! records.

use crate::database::QueryEngine;
use crate::error::Result;
use crate::records::SongRecord;
use crate::tables::{ArtistRow, SongRow};
use duckdb::Row;

const SONGS_QUERY: &str = "
SELECT DISTINCT song_id, title, artist_id, year, duration
FROM song_records
ORDER BY ALL
";

const ARTISTS_QUERY: &str = "
SELECT DISTINCT
    artist_id,
    artist_name AS name,
    artist_location AS location,
    artist_latitude AS latitude,
    artist_longitude AS longitude
FROM song_records
ORDER BY ALL
";

/// The two dimension tables built from the song catalog
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogTables {
    pub songs: Vec<SongRow>,
    pub artists: Vec<ArtistRow>,
}

fn song_row(row: &Row<'_>) -> duckdb::Result<SongRow> {
    Ok(SongRow {
        song_id: row.get(0)?,
        title: row.get(1)?,
        artist_id: row.get(2)?,
        year: row.get(3)?,
        duration: row.get(4)?,
    })
}

fn artist_row(row: &Row<'_>) -> duckdb::Result<ArtistRow> {
    Ok(ArtistRow {
        artist_id: row.get(0)?,
        name: row.get(1)?,
        location: row.get(2)?,
        latitude: row.get(3)?,
        longitude: row.get(4)?,
    })
}

/// Songs table from an engine already holding the catalog
pub fn build_songs(engine: &QueryEngine) -> Result<Vec<SongRow>> {
    engine.query(SONGS_QUERY, song_row)
}

/// Artists table from an engine already holding the catalog
pub fn build_artists(engine: &QueryEngine) -> Result<Vec<ArtistRow>> {
    engine.query(ARTISTS_QUERY, artist_row)
}

/// Build the deduplicated songs and artists tables
pub fn normalize_catalog(records: &[SongRecord]) -> Result<CatalogTables> {
    let engine = QueryEngine::new()?;
    engine.load_songs(records)?;

    Ok(CatalogTables {
        songs: build_songs(&engine)?,
        artists: build_artists(&engine)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(song_id: &str, artist_id: &str, artist_name: &str, title: &str) -> SongRecord {
        SongRecord {
            num_songs: Some(1),
            artist_id: artist_id.to_string(),
            artist_latitude: Some(35.149_68),
            artist_longitude: Some(-90.048_92),
            artist_location: Some("Memphis, TN".to_string()),
            artist_name: Some(artist_name.to_string()),
            song_id: song_id.to_string(),
            title: Some(title.to_string()),
            duration: Some(269.583_22),
            year: Some(0),
        }
    }

    #[test]
    fn test_songs_and_artists_are_projected() {
        let tables = normalize_catalog(&[record("SO1", "AR1", "Elena", "Setanta matins")]).unwrap();
        assert_eq!(
            tables.songs,
            vec![SongRow {
                song_id: "SO1".to_string(),
                title: Some("Setanta matins".to_string()),
                artist_id: "AR1".to_string(),
                year: Some(0),
                duration: Some(269.583_22),
            }]
        );
        assert_eq!(tables.artists[0].name.as_deref(), Some("Elena"));
        assert_eq!(tables.artists[0].location.as_deref(), Some("Memphis, TN"));
        assert_eq!(tables.artists[0].latitude, Some(35.149_68));
    }

    #[test]
    fn test_shared_artist_appears_once() {
        let records = vec![
            record("SO1", "AR1", "Elena", "Setanta matins"),
            record("SO2", "AR1", "Elena", "Another song"),
            record("SO1", "AR1", "Elena", "Setanta matins"),
        ];
        let tables = normalize_catalog(&records).unwrap();
        assert_eq!(tables.songs.len(), 2);
        assert_eq!(tables.artists.len(), 1);
    }

    #[test]
    fn test_artist_with_differing_attributes_is_kept_twice() {
        let mut moved = record("SO2", "AR1", "Elena", "Another song");
        moved.artist_location = Some("Nashville, TN".to_string());
        let tables =
            normalize_catalog(&[record("SO1", "AR1", "Elena", "Setanta matins"), moved]).unwrap();
        assert_eq!(tables.artists.len(), 2);
        assert_eq!(tables.artists[0].location.as_deref(), Some("Memphis, TN"));
        assert_eq!(tables.artists[1].location.as_deref(), Some("Nashville, TN"));
    }

    #[test]
    fn test_null_attributes_dedup_together() {
        let mut bare = record("SO1", "AR1", "Elena", "Setanta matins");
        bare.title = None;
        bare.duration = None;
        bare.artist_latitude = None;
        let tables = normalize_catalog(&[bare.clone(), bare]).unwrap();
        assert_eq!(tables.songs.len(), 1);
        assert_eq!(tables.songs[0].title, None);
        assert_eq!(tables.artists.len(), 1);
        assert_eq!(tables.artists[0].latitude, None);
    }

    #[test]
    fn test_empty_catalog() {
        let tables = normalize_catalog(&[]).unwrap();
        assert_eq!(tables, CatalogTables::default());
    }
}
