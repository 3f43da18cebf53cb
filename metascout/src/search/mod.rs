/// Parallel substring search over a metadata store.
///
/// A query is answered by splitting the store into a fixed number of
/// contiguous chunks and scanning each on its own worker:
///
/// ```rust,ignore
/// let engine = SearchEngine::new(32)?;
/// let output = engine.search(&store, &SearchQuery::new(".py"))?;
/// println!("{}", output.count());
/// ```
///
/// Result order follows worker completion and differs between runs. Compare
/// outputs as sets, never as sequences.
pub mod engine;
pub mod partition;
pub mod query;

pub use engine::{scan_sequential, SearchEngine, DEFAULT_FAN_OUT, MAX_FAN_OUT};
pub use partition::partition;
pub use query::{SearchError, SearchOutput, SearchQuery, SearchResult};
