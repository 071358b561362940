//! Glob filters for object listings
//!
//! Each `*` matches within a single path segment, so
//! `song_data/A/*/*/*.json` only matches files exactly three levels below
//! `song_data/A`.

use crate::error::{Error, Result};
use glob::{MatchOptions, Pattern};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// A compiled glob over store-relative paths
#[derive(Debug, Clone)]
pub struct GlobFilter {
    pattern: Pattern,
    prefix: String,
}

impl GlobFilter {
    /// Compile a pattern
    pub fn new(pattern: &str) -> Result<Self> {
        let pattern = pattern.trim_start_matches('/');
        let compiled = Pattern::new(pattern).map_err(|e| Error::Glob {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self {
            prefix: literal_prefix(pattern).to_string(),
            pattern: compiled,
        })
    }

    /// Longest leading run of whole segments free of glob syntax
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Whether a relative path matches
    pub fn matches(&self, path: &str) -> bool {
        self.pattern.matches_with(path, MATCH_OPTIONS)
    }

    /// Original pattern text
    pub fn as_str(&self) -> &str {
        self.pattern.as_str()
    }
}

/// Leading path segments of `pattern` that contain no glob syntax
pub fn literal_prefix(pattern: &str) -> &str {
    let Some(first_glob) = pattern.find(['*', '?', '[']) else {
        return pattern;
    };
    match pattern[..first_glob].rfind('/') {
        Some(end) => &pattern[..end],
        None => "",
    }
}
