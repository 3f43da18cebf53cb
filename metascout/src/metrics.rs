use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Counters shared by the workers of one search
#[derive(Debug, Clone)]
pub struct SearchMetrics {
    records_scanned: Arc<AtomicU64>,
    matches: Arc<AtomicU64>,
    failed: Arc<AtomicU64>,
    chunks: Arc<AtomicU64>,
    empty_chunks: Arc<AtomicU64>,
}

impl SearchMetrics {
    /// Creates a new SearchMetrics instance
    pub fn new() -> Self {
        Self {
            records_scanned: Arc::new(AtomicU64::new(0)),
            matches: Arc::new(AtomicU64::new(0)),
            failed: Arc::new(AtomicU64::new(0)),
            chunks: Arc::new(AtomicU64::new(0)),
            empty_chunks: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Records a finished chunk and how many of its records were scanned
    pub fn record_chunk(&self, scanned: usize) {
        self.chunks.fetch_add(1, Ordering::Relaxed);
        if scanned == 0 {
            self.empty_chunks.fetch_add(1, Ordering::Relaxed);
        }
        self.records_scanned.fetch_add(scanned as u64, Ordering::Relaxed);
    }

    /// Records a collected result
    pub fn record_result(&self, failed: bool) {
        if failed {
            self.failed.fetch_add(1, Ordering::Relaxed);
        } else {
            self.matches.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn get_stats(&self) -> SearchStats {
        SearchStats {
            records_scanned: self.records_scanned.load(Ordering::Relaxed),
            matches: self.matches.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            chunks: self.chunks.load(Ordering::Relaxed),
            empty_chunks: self.empty_chunks.load(Ordering::Relaxed),
        }
    }

    /// Logs the counters for the finished search
    pub fn log_stats(&self) {
        let stats = self.get_stats();
        debug!(
            "Search stats:\n\
             Records scanned: {}\n\
             Matches/failed: {}/{}\n\
             Chunks (empty): {} ({})",
            stats.records_scanned,
            stats.matches,
            stats.failed,
            stats.chunks,
            stats.empty_chunks
        );
    }
}

impl Default for SearchMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of [`SearchMetrics`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub records_scanned: u64,
    pub matches: u64,
    pub failed: u64,
    pub chunks: u64,
    pub empty_chunks: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_tracking() {
        let metrics = SearchMetrics::new();

        metrics.record_chunk(10);
        metrics.record_chunk(0);
        metrics.record_chunk(5);

        let stats = metrics.get_stats();
        assert_eq!(stats.chunks, 3);
        assert_eq!(stats.empty_chunks, 1);
        assert_eq!(stats.records_scanned, 15);
    }

    #[test]
    fn test_result_tracking() {
        let metrics = SearchMetrics::new();
        let shared = metrics.clone();

        metrics.record_result(false);
        shared.record_result(false);
        shared.record_result(true);

        let stats = metrics.get_stats();
        assert_eq!(stats.matches, 2);
        assert_eq!(stats.failed, 1);
    }
}
