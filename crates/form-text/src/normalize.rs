//! Field-name normalization and lookup

use std::collections::HashMap;

/// Normalize a field or column name for matching
///
/// Lowercases, treats `_` as a space and trims the ends.
/// Inner runs of spaces are kept as-is.
pub fn normalize_key(name: &str) -> String {
    name.to_lowercase().replace('_', " ").trim().to_string()
}

/// Lookup table from normalized key to the position of the first
/// original key that normalizes to it
///
/// Built once per record so field lookups don't rescan the columns.
#[derive(Debug, Clone, Default)]
pub struct KeyIndex {
    positions: HashMap<String, usize>,
}

impl KeyIndex {
    /// Build an index over keys in their original order
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut positions = HashMap::new();
        for (i, key) in keys.into_iter().enumerate() {
            positions.entry(normalize_key(key.as_ref())).or_insert(i);
        }
        Self { positions }
    }

    /// Position of the first key matching `name` after normalization
    pub fn get(&self, name: &str) -> Option<usize> {
        self.positions.get(&normalize_key(name)).copied()
    }

    /// Number of distinct normalized keys
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
