//! Candidate records and normalized field lookup

use crate::parser::value_to_string;
use form_text::KeyIndex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One candidate's column values, in column order
///
/// Usually produced from a spreadsheet row. Values are scalars
/// (string, number, bool or null).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct CandidateRecord {
    columns: Vec<(String, Value)>,
}

impl CandidateRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column (builder style)
    pub fn with(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.insert(column, value);
        self
    }

    /// Append a column; an earlier column with the same name still wins lookups
    pub fn insert(&mut self, column: &str, value: impl Into<Value>) {
        self.columns.push((column.to_string(), value.into()));
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Iterate columns in order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Build a normalized lookup view over this record
    pub fn view(&self) -> RecordView<'_> {
        RecordView {
            record: self,
            index: KeyIndex::new(self.columns.iter().map(|(k, _)| k)),
        }
    }
}

impl From<Map<String, Value>> for CandidateRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self {
            columns: map.into_iter().collect(),
        }
    }
}

impl From<CandidateRecord> for Map<String, Value> {
    fn from(record: CandidateRecord) -> Self {
        let mut map = Map::new();
        for (column, value) in record.columns {
            // Keep the first occurrence, matching lookup semantics
            map.entry(column).or_insert(value);
        }
        map
    }
}

impl FromIterator<(String, Value)> for CandidateRecord {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self {
            columns: iter.into_iter().collect(),
        }
    }
}

/// Case-, underscore- and edge-whitespace-insensitive view of a record
///
/// The first column whose normalized name matches wins.
pub struct RecordView<'a> {
    record: &'a CandidateRecord,
    index: KeyIndex,
}

impl<'a> RecordView<'a> {
    /// Raw value of the first column matching `name`
    pub fn get(&self, name: &str) -> Option<&'a Value> {
        self.index
            .get(name)
            .and_then(|i| self.record.columns.get(i))
            .map(|(_, v)| v)
    }

    /// Display text of the column, `None` when absent or blank
    pub fn text(&self, name: &str) -> Option<String> {
        self.get(name)
            .map(value_to_string)
            .filter(|s| !s.trim().is_empty())
    }
}
