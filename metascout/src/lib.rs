pub mod cancel;
pub mod config;
pub mod errors;
pub mod filters;
pub mod indexer;
pub mod metrics;
pub mod persist;
pub mod report;
pub mod search;
pub mod session;
pub mod store;

pub use cancel::CancellationToken;
pub use config::{ConfigOverrides, ScoutConfig};
pub use errors::{ScoutError, ScoutResult};
pub use indexer::{IndexSummary, Indexer, TraversalMode};
pub use search::{SearchEngine, SearchOutput, SearchQuery, SearchResult};
pub use session::{SessionController, SessionReport, SessionState, StoreSource};
pub use store::{FileRecord, MetadataStore};
