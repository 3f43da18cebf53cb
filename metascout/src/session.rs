/// One index session: reuse or rebuild the index, then answer a query.
///
/// ```text
/// Start -> Loaded ---------------------------> Searched -> Done
///       \-> Indexing -> Saved | SaveFailed -/
/// ```
///
/// The controller owns the [`MetadataStore`] for its whole lifetime and lends
/// it out: mutably to the loader or the indexer while the store is being
/// filled, then shared to the search engine. The two phases never overlap.
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::config::ScoutConfig;
use crate::errors::ScoutResult;
use crate::filters::PathFilter;
use crate::indexer::{IndexSummary, Indexer, ProgressFn};
use crate::search::{SearchEngine, SearchOutput, SearchQuery};
use crate::store::MetadataStore;

/// Session lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Start,
    Loaded,
    Indexing,
    Saved,
    SaveFailed,
    Searched,
    Done,
}

/// Where the queried store came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreSource {
    /// Restored from the persisted index
    Loaded,
    /// Built by walking the root directory
    Rebuilt(IndexSummary),
}

/// Everything a finished session produced
#[derive(Debug, Clone)]
pub struct SessionReport {
    pub source: StoreSource,
    /// `Some(true)` if a rebuilt index was persisted, `Some(false)` if saving
    /// failed, `None` when the index was loaded
    pub saved: Option<bool>,
    pub output: SearchOutput,
}

impl SessionReport {
    pub fn count(&self) -> usize {
        self.output.count()
    }
}

pub struct SessionController {
    config: ScoutConfig,
    store: MetadataStore,
    history: Vec<SessionState>,
    progress: Option<ProgressFn>,
}

impl SessionController {
    pub fn new(config: ScoutConfig) -> Self {
        Self {
            config,
            store: MetadataStore::new(),
            history: vec![SessionState::Start],
            progress: None,
        }
    }

    /// Forwards indexing progress to `progress`
    pub fn with_progress(mut self, progress: ProgressFn) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn config(&self) -> &ScoutConfig {
        &self.config
    }

    pub fn store(&self) -> &MetadataStore {
        &self.store
    }

    /// Every state visited so far, starting with [`SessionState::Start`]
    pub fn history(&self) -> &[SessionState] {
        &self.history
    }

    pub fn state(&self) -> SessionState {
        *self.history.last().unwrap_or(&SessionState::Start)
    }

    fn transition(&mut self, next: SessionState) {
        debug!("Session {:?} -> {:?}", self.state(), next);
        self.history.push(next);
    }

    /// Fills the store from the persisted index, rebuilding it if that fails
    pub fn prepare(&mut self) -> ScoutResult<(StoreSource, Option<bool>)> {
        let index_path = self.config.index_path.clone();

        if self.config.force_reindex {
            info!("Reindex requested, ignoring {}", index_path.display());
        } else {
            match self.store.load_from(&index_path) {
                Ok(()) => {
                    info!(
                        "Loaded {} records from {}",
                        self.store.len(),
                        index_path.display()
                    );
                    self.transition(SessionState::Loaded);
                    return Ok((StoreSource::Loaded, None));
                }
                Err(e) if e.is_recoverable_load_failure() => {
                    info!("No usable index at {} ({}), rebuilding", index_path.display(), e);
                }
                Err(e) => {
                    warn!("Failed to load index {}: {}, rebuilding", index_path.display(), e);
                }
            }
        }

        self.transition(SessionState::Indexing);
        let summary = self.rebuild()?;

        let saved = match self.store.save_to(&index_path) {
            Ok(()) => {
                info!("Saved index to {}", index_path.display());
                self.transition(SessionState::Saved);
                true
            }
            Err(e) => {
                warn!("Error saving index to {}: {}", index_path.display(), e);
                self.transition(SessionState::SaveFailed);
                false
            }
        };

        Ok((StoreSource::Rebuilt(summary), Some(saved)))
    }

    fn rebuild(&mut self) -> ScoutResult<IndexSummary> {
        let filter = PathFilter::new(&self.config.ignore_patterns)?;
        let mut indexer = Indexer::new().with_filter(filter);
        if let Some(progress) = &self.progress {
            indexer = indexer.with_progress(progress.clone());
        }

        self.store.clear();
        indexer.index_tree(&self.config.root_path, &mut self.store)
    }

    /// Runs the configured query against the prepared store
    pub fn search(&mut self, engine: &SearchEngine) -> ScoutResult<SearchOutput> {
        let query = SearchQuery::new(self.config.pattern.clone());
        let output = engine.search(&self.store, &query)?;
        self.transition(SessionState::Searched);
        Ok(output)
    }

    /// Drives the whole session: load or rebuild, persist, search
    pub fn run(&mut self) -> ScoutResult<SessionReport> {
        let started = Instant::now();
        let engine = SearchEngine::new(self.config.fan_out)?;

        let (source, saved) = self.prepare()?;
        let output = self.search(&engine)?;
        self.transition(SessionState::Done);

        info!(
            "Session finished in {}",
            humantime::format_duration(started.elapsed())
        );
        Ok(SessionReport {
            source,
            saved,
            output,
        })
    }
}
