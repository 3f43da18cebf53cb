/// Directory tree indexing.
///
/// The indexer turns a traversal into [`FileRecord`]s appended to a
/// [`MetadataStore`]. Traversal is always [`TraversalMode::BestEffort`]: an
/// entry that cannot be read is counted in [`IndexSummary::skipped`] and left
/// out of the store, and the walk carries on. Only a root that cannot be walked
/// at all is reported as an error.
///
/// The filesystem walk itself comes from `ignore::WalkBuilder` with every
/// filter switched off, so hidden files and anything listed in `.gitignore` are
/// indexed like any other entry. [`Indexer::index_entries`] accepts any
/// traversal, which is how tests drive the skip-and-continue path without
/// depending on filesystem permissions.
use ignore::WalkBuilder;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, trace};

use crate::errors::{ScoutError, ScoutResult};
use crate::filters::PathFilter;
use crate::store::{FileRecord, MetadataStore};

/// How often the progress observer is notified while indexing
const PROGRESS_INTERVAL: usize = 1024;

/// Observer called with the running count of indexed records
pub type ProgressFn = Arc<dyn Fn(usize) + Send + Sync>;

/// How traversal failures are treated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TraversalMode {
    /// Unreadable entries are skipped and counted; the walk never aborts
    #[default]
    BestEffort,
}

/// A leaf entry produced by a traversal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraversalEntry {
    pub path: PathBuf,
    pub size: u64,
    pub is_dir: bool,
}

impl TraversalEntry {
    pub fn file(path: impl Into<PathBuf>, size: u64) -> Self {
        Self {
            path: path.into(),
            size,
            is_dir: false,
        }
    }

    pub fn dir(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            size: 0,
            is_dir: true,
        }
    }
}

/// A per-entry traversal failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraversalError {
    pub path: Option<PathBuf>,
    pub message: String,
}

impl TraversalError {
    pub fn new(path: Option<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
        }
    }
}

/// Counts from a single index build
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexSummary {
    /// Records appended to the store
    pub indexed: usize,
    /// Entries dropped because they could not be read
    pub skipped: usize,
    /// Directories visited (never indexed)
    pub directories: usize,
    /// Entries dropped by ignore patterns
    pub excluded: usize,
}

/// Builds a metadata store from a directory tree
#[derive(Clone, Default)]
pub struct Indexer {
    mode: TraversalMode,
    filter: PathFilter,
    progress: Option<ProgressFn>,
}

impl std::fmt::Debug for Indexer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Indexer")
            .field("mode", &self.mode)
            .field("filter", &self.filter)
            .field("progress", &self.progress.is_some())
            .finish()
    }
}

impl Indexer {
    /// Creates an indexer that indexes every leaf entry
    pub fn new() -> Self {
        Default::default()
    }

    /// Excludes entries whose path matches one of the compiled patterns
    pub fn with_filter(mut self, filter: PathFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Registers a progress observer
    pub fn with_progress(mut self, progress: ProgressFn) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn mode(&self) -> TraversalMode {
        self.mode
    }

    /// Walks `root` recursively and appends every non-directory entry to `store`
    pub fn index_tree(&self, root: &Path, store: &mut MetadataStore) -> ScoutResult<IndexSummary> {
        let root_meta = fs::metadata(root).map_err(|_| ScoutError::root_unreadable(root))?;
        if !root_meta.is_dir() || fs::read_dir(root).is_err() {
            return Err(ScoutError::root_unreadable(root));
        }

        info!("Indexing {}", root.display());
        let started = Instant::now();

        let mut builder = WalkBuilder::new(root);
        builder.standard_filters(false).follow_links(false);

        let entries = builder.build().map(|result| match result {
            Ok(entry) => {
                let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
                if is_dir {
                    return Ok(TraversalEntry::dir(entry.into_path()));
                }
                match entry.metadata() {
                    Ok(meta) => Ok(TraversalEntry::file(entry.into_path(), meta.len())),
                    Err(e) => Err(TraversalError::new(
                        Some(entry.into_path()),
                        e.to_string(),
                    )),
                }
            }
            Err(e) => Err(TraversalError::new(None, e.to_string())),
        });

        let summary = self.index_entries(entries, store);

        info!(
            "Indexed {} files under {} in {} ({} skipped, {} excluded)",
            summary.indexed,
            root.display(),
            humantime::format_duration(started.elapsed()),
            summary.skipped,
            summary.excluded
        );
        Ok(summary)
    }

    /// Appends the leaf entries of an arbitrary traversal to `store`
    pub fn index_entries<I>(&self, entries: I, store: &mut MetadataStore) -> IndexSummary
    where
        I: IntoIterator<Item = Result<TraversalEntry, TraversalError>>,
    {
        let mut summary = IndexSummary::default();

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    debug!(
                        "Skipping unreadable entry {}: {}",
                        err.path
                            .as_deref()
                            .map(|p| p.display().to_string())
                            .unwrap_or_else(|| "<unknown>".to_string()),
                        err.message
                    );
                    summary.skipped += 1;
                    continue;
                }
            };

            if entry.is_dir {
                summary.directories += 1;
                continue;
            }
            if self.filter.should_ignore(&entry.path) {
                trace!("Excluding {}", entry.path.display());
                summary.excluded += 1;
                continue;
            }

            trace!("Indexing {} ({} bytes)", entry.path.display(), entry.size);
            let size = i64::try_from(entry.size).unwrap_or(i64::MAX);
            store.push(FileRecord::new(entry.path.to_string_lossy(), size));
            summary.indexed += 1;

            if let Some(progress) = &self.progress {
                if summary.indexed % PROGRESS_INTERVAL == 0 {
                    progress(summary.indexed);
                }
            }
        }

        if let Some(progress) = &self.progress {
            progress(summary.indexed);
        }

        debug!(
            "Traversal finished: {} indexed, {} directories, {} skipped",
            summary.indexed, summary.directories, summary.skipped
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::tempdir;

    #[test]
    fn test_skips_failed_entries_and_continues() {
        let entries = vec![
            Ok(TraversalEntry::dir("/root")),
            Ok(TraversalEntry::file("/root/a.py", 3)),
            Err(TraversalError::new(
                Some(PathBuf::from("/root/locked")),
                "permission denied",
            )),
            Ok(TraversalEntry::file("/root/b.txt", 4)),
            Err(TraversalError::new(None, "broken symlink")),
            Ok(TraversalEntry::file("/root/c.py", 5)),
        ];

        let mut store = MetadataStore::new();
        let indexer = Indexer::new();
        assert_eq!(indexer.mode(), TraversalMode::BestEffort);
        let summary = indexer.index_entries(entries, &mut store);

        assert_eq!(summary.indexed, 3);
        assert_eq!(summary.skipped, 2);
        assert_eq!(summary.directories, 1);
        let paths: Vec<&str> = store.iter().map(FileRecord::path).collect();
        assert_eq!(paths, vec!["/root/a.py", "/root/b.txt", "/root/c.py"]);
    }

    #[test]
    fn test_appends_to_existing_store() {
        let mut store = MetadataStore::new();
        store.push(FileRecord::new("existing", 1));

        Indexer::new().index_entries(vec![Ok(TraversalEntry::file("new", 2))], &mut store);
        assert_eq!(store.len(), 2);
        assert_eq!(store.records()[1], FileRecord::new("new", 2));
    }

    #[test]
    fn test_index_tree_collects_leaf_files() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("top.py"), "print(1)").unwrap();
        fs::write(nested.join("deep.txt"), "hello").unwrap();
        fs::write(dir.path().join(".hidden"), "").unwrap();

        let mut store = MetadataStore::new();
        let summary = Indexer::new().index_tree(dir.path(), &mut store).unwrap();

        assert_eq!(summary.indexed, 3);
        assert_eq!(summary.skipped, 0);
        assert!(summary.directories >= 3);

        let deep = store
            .iter()
            .find(|r| r.path().ends_with("deep.txt"))
            .expect("deep file indexed");
        assert_eq!(deep.size(), 5);
        assert!(store.iter().all(|r| !Path::new(r.path()).is_dir()));
    }

    #[test]
    fn test_index_tree_applies_filter() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("cache")).unwrap();
        fs::write(dir.path().join("keep.py"), "").unwrap();
        fs::write(dir.path().join("cache").join("drop.py"), "").unwrap();

        let filter = PathFilter::new(&["*/cache/*".to_string()]).unwrap();
        let mut store = MetadataStore::new();
        let summary = Indexer::new()
            .with_filter(filter)
            .index_tree(dir.path(), &mut store)
            .unwrap();

        assert_eq!(summary.indexed, 1);
        assert_eq!(summary.excluded, 1);
        assert!(store.records()[0].path().ends_with("keep.py"));
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let dir = tempdir().unwrap();
        let mut store = MetadataStore::new();
        let err = Indexer::new()
            .index_tree(&dir.path().join("missing"), &mut store)
            .unwrap_err();
        assert!(matches!(err, ScoutError::RootUnreadable(_)));
        assert!(store.is_empty());
    }

    #[test]
    fn test_progress_reports_final_count() {
        let seen = Arc::new(AtomicUsize::new(0));
        let observer = seen.clone();
        let indexer = Indexer::new().with_progress(Arc::new(move |n: usize| {
            observer.store(n, Ordering::SeqCst);
        }));

        let entries = (0..10).map(|i| Ok(TraversalEntry::file(format!("f{}", i), i)));
        let mut store = MetadataStore::new();
        indexer.index_entries(entries, &mut store);

        assert_eq!(seen.load(Ordering::SeqCst), 10);
    }
}
