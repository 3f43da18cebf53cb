use std::fmt;

use crate::store::FileRecord;

/// A substring query against indexed paths
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pattern: String,
}

impl SearchQuery {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Tests one record. The empty pattern matches every path.
    #[inline]
    pub fn matches(&self, record: &FileRecord) -> bool {
        record.path().contains(self.pattern.as_str())
    }

    /// Produces the emission for a hit, or `None` for a miss
    pub(crate) fn scan(&self, record: &FileRecord) -> Option<SearchResult> {
        self.matches(record).then(|| SearchResult::matched(record.clone()))
    }
}

/// Failure while testing a single record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// The record could not be tested against the pattern
    Unmatchable { path: String, reason: String },
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchError::Unmatchable { path, reason } => {
                write!(f, "cannot match {}: {}", path, reason)
            }
        }
    }
}

impl std::error::Error for SearchError {}

/// One emission from a search worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub record: FileRecord,
    pub error: Option<SearchError>,
}

impl SearchResult {
    pub fn matched(record: FileRecord) -> Self {
        Self {
            record,
            error: None,
        }
    }

    pub fn failed(record: FileRecord, error: SearchError) -> Self {
        Self {
            record,
            error: Some(error),
        }
    }

    /// Only error-free results count as matches
    pub fn is_match(&self) -> bool {
        self.error.is_none()
    }
}

/// Aggregated outcome of one query
#[derive(Debug, Clone, Default)]
pub struct SearchOutput {
    /// Matching records, in worker completion order
    pub matches: Vec<FileRecord>,
    /// Results that carried an error and were left out of `matches`
    pub failed: Vec<SearchResult>,
    /// Records in the store when the query ran
    pub records_total: usize,
}

impl SearchOutput {
    pub fn new(records_total: usize) -> Self {
        Self {
            records_total,
            ..Default::default()
        }
    }

    /// Routes a worker emission into matches or failures
    pub fn add_result(&mut self, result: SearchResult) {
        if result.is_match() {
            self.matches.push(result.record);
        } else {
            self.failed.push(result);
        }
    }

    pub fn count(&self) -> usize {
        self.matches.len()
    }

    /// Matching paths, in result order
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.matches.iter().map(FileRecord::path)
    }
}
