/// In-memory file metadata store.
///
/// A [`MetadataStore`] is an ordered list of [`FileRecord`]s whose order is the
/// order the indexer produced them in. The store is built once, then shared by
/// reference with the search workers; nothing mutates it while a query runs
/// because every worker only holds a `&MetadataStore`.
use serde::{Deserialize, Serialize};
use std::slice;

/// One indexed filesystem entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileRecord {
    path: String,
    size: i64,
}

impl FileRecord {
    pub fn new(path: impl Into<String>, size: i64) -> Self {
        Self {
            path: path.into(),
            size,
        }
    }

    /// The path as it was seen during traversal
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Byte length at index time
    pub fn size(&self) -> i64 {
        self.size
    }
}

/// Ordered collection of file records
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetadataStore {
    records: Vec<FileRecord>,
}

impl MetadataStore {
    /// Creates a new empty store
    pub fn new() -> Self {
        Default::default()
    }

    /// Appends a record, keeping insertion order
    pub fn push(&mut self, record: FileRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, FileRecord> {
        self.records.iter()
    }

    /// Read-only view of every record in insertion order
    pub fn records(&self) -> &[FileRecord] {
        &self.records
    }

    /// Replaces the whole contents, as a restore from disk does
    pub fn replace_with(&mut self, other: MetadataStore) {
        self.records = other.records;
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Sum of all record sizes, saturating at `i64::MAX`
    pub fn total_size(&self) -> i64 {
        self.records
            .iter()
            .fold(0i64, |acc, r| acc.saturating_add(r.size))
    }
}

impl FromIterator<FileRecord> for MetadataStore {
    fn from_iter<I: IntoIterator<Item = FileRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl Extend<FileRecord> for MetadataStore {
    fn extend<I: IntoIterator<Item = FileRecord>>(&mut self, iter: I) {
        self.records.extend(iter);
    }
}

impl<'a> IntoIterator for &'a MetadataStore {
    type Item = &'a FileRecord;
    type IntoIter = slice::Iter<'a, FileRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
