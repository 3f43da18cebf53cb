/// Error types for metascout.
///
/// Every fallible library operation returns [`ScoutResult`]. The variants map
/// onto the recovery points of an index session:
///
/// - traversal failures never reach this type; the indexer counts and skips them
/// - [`ScoutError::Io`], [`ScoutError::Decode`] and
///   [`ScoutError::IndexVersionMismatch`] from a load send the session back to a
///   full rebuild
/// - a failed save is logged and the session keeps its in-memory store
/// - [`ScoutError::RootUnreadable`] is the only condition that ends a session
///
/// ```rust,ignore
/// match persist::load(&index_path) {
///     Ok(store) => // reuse the persisted index,
///     Err(ScoutError::Io(_)) | Err(ScoutError::Decode(_)) => // rebuild,
///     Err(e) => // other failures
/// }
/// ```
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for index and search operations
pub type ScoutResult<T> = Result<T, ScoutError>;

/// Errors that can occur while building, persisting or querying an index
#[derive(Error, Debug)]
pub enum ScoutError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Root directory cannot be traversed: {0}")]
    RootUnreadable(PathBuf),
    #[error("Failed to encode index: {0}")]
    Encode(String),
    #[error("Failed to decode index: {0}")]
    Decode(String),
    #[error("Index version mismatch: expected {current_version}, found {index_version}")]
    IndexVersionMismatch {
        index_version: u32,
        current_version: u32,
    },
    #[error("Failed to start search workers: {0}")]
    WorkerPool(String),
    #[error("Search cancelled after {scanned} of {total} records")]
    Cancelled { scanned: usize, total: usize },
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl ScoutError {
    pub fn root_unreadable(path: impl AsRef<Path>) -> Self {
        Self::RootUnreadable(path.as_ref().to_path_buf())
    }

    pub fn encode(msg: impl ToString) -> Self {
        Self::Encode(msg.to_string())
    }

    pub fn decode(msg: impl ToString) -> Self {
        Self::Decode(msg.to_string())
    }

    pub fn index_version_mismatch(index_version: u32, current_version: u32) -> Self {
        Self::IndexVersionMismatch {
            index_version,
            current_version,
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Whether a session should answer this load failure with a full rebuild.
    pub fn is_recoverable_load_failure(&self) -> bool {
        matches!(
            self,
            Self::Io(_) | Self::Decode(_) | Self::IndexVersionMismatch { .. }
        )
    }
}

impl From<config::ConfigError> for ScoutError {
    fn from(err: config::ConfigError) -> Self {
        Self::ConfigError(err.to_string())
    }
}
