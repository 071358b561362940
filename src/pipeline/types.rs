//! Pipeline types

use crate::output::WriteSummary;
use std::fmt;

/// Which normalizers a run executes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Songs and artists
    Catalog,
    /// Users, time and songplays
    Events,
    /// Catalog then events
    All,
}

impl Stage {
    pub fn includes_catalog(self) -> bool {
        matches!(self, Stage::Catalog | Stage::All)
    }

    pub fn includes_events(self) -> bool {
        matches!(self, Stage::Events | Stage::All)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Catalog => write!(f, "catalog"),
            Stage::Events => write!(f, "events"),
            Stage::All => write!(f, "all"),
        }
    }
}

/// Counters collected over a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Input files read
    pub files_read: usize,
    /// Raw records kept after conformance
    pub records_read: usize,
    /// Raw lines dropped as malformed
    pub records_dropped: usize,
    /// Tables written, in write order
    pub tables: Vec<WriteSummary>,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl RunStats {
    /// Create new stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one decoded input file
    pub fn add_file(&mut self, kept: usize, dropped: usize) {
        self.files_read += 1;
        self.records_read += kept;
        self.records_dropped += dropped;
    }

    /// Add a written table
    pub fn add_table(&mut self, summary: WriteSummary) {
        self.tables.push(summary);
    }

    /// Rows written across all tables
    pub fn rows_written(&self) -> usize {
        self.tables.iter().map(|t| t.rows).sum()
    }

    /// Set duration
    pub fn set_duration(&mut self, ms: u64) {
        self.duration_ms = ms;
    }
}
