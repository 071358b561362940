//! Output tables
//!
//! Row types for the five analytical tables and their Arrow layout.
//! `start_time` columns hold UTC instants tagged with the session zone.
//!
//! | Table | Path | Partitioned by |
//! |-------|------|----------------|
//! | songs | `Songs/songs.parquet` | year, artist_id |
//! | artists | `Artists/artists.parquet` | - |
//! | users | `Users/users.parquet` | - |
//! | time | `Time/time.parquet` | year, month |
//! | songplays | `Songplays/songplays.parquet` | year, month |

mod rows;
mod types;

pub use rows::{ArtistRow, SongRow, SongplayRow, TimeRow, UserRow};
pub use types::Table;

#[cfg(test)]
mod tests;
