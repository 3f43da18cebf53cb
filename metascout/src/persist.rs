/// Index persistence.
///
/// The index file is a postcard-encoded header `(magic, version)` followed by
/// the records in store order. Writes go to a temporary file in the target
/// directory and are renamed into place, so a crash mid-save leaves either the
/// old index or the new one, never a torn file.
///
/// Loading is all-or-nothing. Any decode problem (wrong magic, unknown version,
/// truncated or trailing bytes) fails the whole load and leaves the caller's
/// store untouched; the session answers that by rebuilding.
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::errors::{ScoutError, ScoutResult};
use crate::store::MetadataStore;

/// Identifies a metascout index file ("MSDX")
const INDEX_MAGIC: u32 = 0x4D53_4458;

/// Bump when the record layout changes
pub const INDEX_VERSION: u32 = 1;

/// Serializes the whole store to `path`, replacing any existing file
pub fn save(store: &MetadataStore, path: &Path) -> ScoutResult<()> {
    let bytes = encode(store)?;

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => {
            fs::create_dir_all(p)?;
            p
        }
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(&bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| ScoutError::Io(e.error))?;

    debug!(
        "Saved {} records ({} bytes) to {}",
        store.len(),
        bytes.len(),
        path.display()
    );
    Ok(())
}

/// Reads `path` and reconstructs the store it holds
pub fn load(path: &Path) -> ScoutResult<MetadataStore> {
    let bytes = fs::read(path)?;
    let store = decode(&bytes)?;
    debug!("Loaded {} records from {}", store.len(), path.display());
    Ok(store)
}

/// Encodes a store into the on-disk representation
pub fn encode(store: &MetadataStore) -> ScoutResult<Vec<u8>> {
    postcard::to_stdvec(&(INDEX_MAGIC, INDEX_VERSION, store)).map_err(ScoutError::encode)
}

/// Decodes the on-disk representation, rejecting anything but an exact match
pub fn decode(bytes: &[u8]) -> ScoutResult<MetadataStore> {
    let ((magic, version), rest) =
        postcard::take_from_bytes::<(u32, u32)>(bytes).map_err(ScoutError::decode)?;

    if magic != INDEX_MAGIC {
        return Err(ScoutError::decode(format!(
            "not an index file (magic {:#010x})",
            magic
        )));
    }
    if version != INDEX_VERSION {
        return Err(ScoutError::index_version_mismatch(version, INDEX_VERSION));
    }

    let (store, rest) =
        postcard::take_from_bytes::<MetadataStore>(rest).map_err(ScoutError::decode)?;
    if !rest.is_empty() {
        return Err(ScoutError::decode(format!(
            "{} trailing bytes after records",
            rest.len()
        )));
    }
    Ok(store)
}

impl MetadataStore {
    /// Replaces this store with the contents of `path`.
    ///
    /// On error the current contents are kept as they were.
    pub fn load_from(&mut self, path: &Path) -> ScoutResult<()> {
        let loaded = load(path)?;
        self.replace_with(loaded);
        Ok(())
    }

    /// Writes this store to `path`
    pub fn save_to(&self, path: &Path) -> ScoutResult<()> {
        save(self, path)
    }
}
