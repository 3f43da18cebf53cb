use crossbeam_channel::{bounded, Receiver, Sender};
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::time::Instant;
use tracing::{debug, info, trace};

use super::partition::partition;
use super::query::{SearchOutput, SearchQuery, SearchResult};
use crate::cancel::CancellationToken;
use crate::errors::{ScoutError, ScoutResult};
use crate::metrics::SearchMetrics;
use crate::store::{FileRecord, MetadataStore};

/// Default number of chunk workers
pub const DEFAULT_FAN_OUT: usize = 32;

/// Largest fan-out an engine accepts; each chunk gets its own pool thread
pub const MAX_FAN_OUT: usize = 4096;

/// What a worker hands to the aggregator. Each emission accounts for a known
/// number of records so the aggregator can count down to the store length.
#[derive(Debug)]
enum Emission {
    /// A tested record; accounts for one record
    Hit(SearchResult),
    /// Records that did not match
    Misses(usize),
    /// Records left unscanned because the search was cancelled
    Unscanned(usize),
}

impl Emission {
    fn records(&self) -> usize {
        match self {
            Emission::Hit(_) => 1,
            Emission::Misses(n) | Emission::Unscanned(n) => *n,
        }
    }
}

/// Fixed fan-out parallel search over a [`MetadataStore`].
///
/// The store is split into `fan_out` contiguous chunks and each chunk is
/// scanned by its own task. Tasks hand results to a single aggregator over a
/// zero-capacity channel, so a worker blocks until its emission is taken.
/// The aggregator knows up front how many records the chunks cover and stops
/// once every one of them has been accounted for.
///
/// The worker pool has `fan_out + 1` threads: the aggregator occupies one
/// while it waits on the channel, which leaves a thread for every chunk.
pub struct SearchEngine {
    fan_out: usize,
    pool: ThreadPool,
}

impl std::fmt::Debug for SearchEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchEngine")
            .field("fan_out", &self.fan_out)
            .finish()
    }
}

impl SearchEngine {
    /// Creates an engine with `fan_out` chunk workers (zero is treated as one).
    /// A fan-out above [`MAX_FAN_OUT`] is rejected.
    pub fn new(fan_out: usize) -> ScoutResult<Self> {
        if fan_out > MAX_FAN_OUT {
            return Err(ScoutError::config_error(format!(
                "fan_out {} exceeds the maximum of {}",
                fan_out, MAX_FAN_OUT
            )));
        }
        let fan_out = fan_out.max(1);
        let pool = ThreadPoolBuilder::new()
            .num_threads(fan_out.saturating_add(1))
            .thread_name(|i| format!("metascout-search-{}", i))
            .build()
            .map_err(|e| ScoutError::WorkerPool(e.to_string()))?;
        Ok(Self { fan_out, pool })
    }

    pub fn fan_out(&self) -> usize {
        self.fan_out
    }

    /// Runs a query to completion
    pub fn search(&self, store: &MetadataStore, query: &SearchQuery) -> ScoutResult<SearchOutput> {
        self.search_with_cancel(store, query, &CancellationToken::new())
    }

    /// Runs a query, stopping early if `cancel` fires
    pub fn search_with_cancel(
        &self,
        store: &MetadataStore,
        query: &SearchQuery,
        cancel: &CancellationToken,
    ) -> ScoutResult<SearchOutput> {
        info!("Searching {} records for '{}'", store.len(), query.pattern());
        let started = Instant::now();

        let records = store.records();
        let chunks = partition(records.len(), self.fan_out);
        let expected: usize = chunks.iter().map(|c| c.len()).sum();
        debug!("Split {} records into {} chunks", expected, chunks.len());

        let metrics = SearchMetrics::new();
        let (output, unscanned) = self.pool.scope(|scope| {
            let (tx, rx) = bounded::<Emission>(0);

            for (id, range) in chunks.into_iter().enumerate() {
                let tx = tx.clone();
                let chunk = &records[range];
                let metrics = &metrics;
                scope.spawn(move |_| scan_chunk(id, chunk, query, cancel, &tx, metrics));
            }
            drop(tx);

            collect(&rx, expected, &metrics)
        });

        metrics.log_stats();

        if unscanned > 0 {
            return Err(ScoutError::Cancelled {
                scanned: expected - unscanned,
                total: expected,
            });
        }

        info!(
            "Search complete. Found {} matches in {}",
            output.count(),
            humantime::format_duration(started.elapsed())
        );
        Ok(output)
    }
}

/// Scans one chunk and emits a hit per match plus a tally for the misses
fn scan_chunk(
    id: usize,
    chunk: &[FileRecord],
    query: &SearchQuery,
    cancel: &CancellationToken,
    tx: &Sender<Emission>,
    metrics: &SearchMetrics,
) {
    trace!("Chunk {} scanning {} records", id, chunk.len());
    let mut misses = 0;

    for (scanned, record) in chunk.iter().enumerate() {
        if cancel.is_cancelled() {
            trace!("Chunk {} cancelled after {} records", id, scanned);
            metrics.record_chunk(scanned);
            if misses > 0 && tx.send(Emission::Misses(misses)).is_err() {
                return;
            }
            let _ = tx.send(Emission::Unscanned(chunk.len() - scanned));
            return;
        }

        match query.scan(record) {
            Some(result) => {
                // Receiver gone means the aggregator is done with us
                if tx.send(Emission::Hit(result)).is_err() {
                    return;
                }
            }
            None => misses += 1,
        }
    }

    metrics.record_chunk(chunk.len());
    if misses > 0 {
        let _ = tx.send(Emission::Misses(misses));
    }
}

/// Receives until the chunks' records are all accounted for.
/// Returns the aggregated output and the number of unscanned records.
fn collect(
    rx: &Receiver<Emission>,
    expected: usize,
    metrics: &SearchMetrics,
) -> (SearchOutput, usize) {
    let mut output = SearchOutput::new(expected);
    let mut remaining = expected;
    let mut unscanned = 0;

    while remaining > 0 {
        let Ok(emission) = rx.recv() else {
            // Every sender dropped early; only a panicking worker gets here
            break;
        };
        remaining = remaining.saturating_sub(emission.records());

        match emission {
            Emission::Hit(result) => {
                metrics.record_result(!result.is_match());
                output.add_result(result);
            }
            Emission::Misses(_) => {}
            Emission::Unscanned(n) => unscanned += n,
        }
    }

    (output, unscanned)
}

/// Single-threaded scan in store order
pub fn scan_sequential(store: &MetadataStore, query: &SearchQuery) -> Vec<FileRecord> {
    store.iter().filter(|r| query.matches(r)).cloned().collect()
}
