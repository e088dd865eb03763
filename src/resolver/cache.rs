//! Resolution cache
//!
//! Maps a requested qualified name to the document last fetched for it.
//! Entries live until the cache is cleared; remote changes are not seen.

use std::collections::HashMap;

use super::ResolvedUnit;

/// In-memory, process-scoped resolution cache
#[derive(Debug, Default)]
pub struct ResolutionCache {
    entries: HashMap<String, ResolvedUnit>,
}

impl ResolutionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&ResolvedUnit> {
        self.entries.get(name)
    }

    pub fn insert(&mut self, unit: ResolvedUnit) {
        self.entries.insert(unit.name.as_str().to_string(), unit);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
