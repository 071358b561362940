//! Decoder types

/// Records decoded from one body, plus how many lines were dropped
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded<T> {
    /// Records that conformed to the schema
    pub records: Vec<T>,
    /// Non-blank lines that failed to parse or conform
    pub dropped: usize,
}

impl<T> Decoded<T> {
    /// Create an empty result
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            dropped: 0,
        }
    }

    /// Number of kept records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no record was kept
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<T> Default for Decoded<T> {
    fn default() -> Self {
        Self::new()
    }
}
