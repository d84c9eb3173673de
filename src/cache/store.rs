//! Content-addressed cache store.
//!
//! Durable cross-build memory: route -> `{hash, path}`. Mutations are held in
//! memory and only reach disk through [`ContentCache::persist`].

use std::fs;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashSet;

use crate::core::Route;
use crate::freshness::ContentHash;

use super::index::{CacheEntry, CacheIndex, INDEX_FILE, INDEX_VERSION};
use super::{CACHE_DIR, CacheError};

/// Staleness of a discovered source file, decided once during discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Freshness {
    /// Content hash equals the stored one; reuse the recorded output.
    Unchanged { output: Route },
    /// A prior entry exists with a different hash; overwrite its output in place.
    Update { prior: Route, hash: ContentHash },
    /// First sight of this route.
    Insert { hash: ContentHash },
}

impl Freshness {
    /// Output path reserved from a previous build, if any.
    pub fn reserved_output(&self) -> Option<&Route> {
        match self {
            Self::Unchanged { output } => Some(output),
            Self::Update { prior, .. } => Some(prior),
            Self::Insert { .. } => None,
        }
    }

    #[inline]
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Self::Unchanged { .. })
    }
}

/// Persistent route -> content hash store.
#[derive(Debug)]
pub struct ContentCache {
    file: PathBuf,
    index: CacheIndex,
}

impl ContentCache {
    /// Open the cache under `build_dir`, loading the index when present.
    ///
    /// A missing index is an empty cache; an unreadable or corrupt one is an error.
    pub fn open(build_dir: &Path) -> Result<Self, CacheError> {
        let file = build_dir.join(CACHE_DIR).join(INDEX_FILE);
        let index = load_index(&file)?;
        crate::debug!("cache"; "loaded {} entries from {}", index.entries.len(), file.display());
        Ok(Self { file, index })
    }

    /// Classify raw source content against the stored entry for `route`.
    pub fn classify(&self, route: &Route, content: &[u8]) -> Freshness {
        let hash = ContentHash::of(content);
        match self.index.entries.get(route) {
            Some(entry) if entry.hash == hash && !entry.stale => Freshness::Unchanged {
                output: entry.path.clone(),
            },
            Some(entry) => Freshness::Update {
                prior: entry.path.clone(),
                hash,
            },
            None => Freshness::Insert { hash },
        }
    }

    pub fn get(&self, route: &Route) -> Option<&CacheEntry> {
        self.index.entries.get(route)
    }

    /// Rewrite the stored hash of an existing entry, keeping its output path.
    pub fn commit_update(&mut self, route: &Route, hash: ContentHash) -> Result<(), CacheError> {
        let entry = self
            .index
            .entries
            .get_mut(route)
            .ok_or_else(|| CacheError::UnknownRoute(route.clone()))?;
        entry.hash = hash;
        entry.stale = false;
        Ok(())
    }

    /// Insert a new entry once its output path is known.
    pub fn commit_insert(&mut self, route: Route, hash: ContentHash, output: Route) {
        self.index
            .entries
            .insert(route, CacheEntry { hash, path: output, stale: false });
    }

    /// Force the next build to rebuild `route` in place, keeping its output path.
    ///
    /// Returns `false` when the route has no entry.
    pub fn invalidate(&mut self, route: &Route) -> bool {
        match self.index.entries.get_mut(route) {
            Some(entry) => {
                entry.stale = true;
                true
            }
            None => false,
        }
    }

    /// Drop every entry whose route was not observed in this discovery pass.
    ///
    /// Returns the number of pruned entries.
    pub fn sweep(&mut self, observed: &FxHashSet<Route>) -> usize {
        let before = self.index.entries.len();
        self.index.entries.retain(|route, _| observed.contains(route));
        before - self.index.entries.len()
    }

    /// Write the index to disk (temp file + rename).
    pub fn persist(&mut self) -> Result<usize, CacheError> {
        let io_err = |e| CacheError::Io(self.file.clone(), e);

        if let Some(dir) = self.file.parent() {
            fs::create_dir_all(dir).map_err(io_err)?;
        }

        self.index.version = INDEX_VERSION;
        self.index.touch();
        let json = serde_json::to_string_pretty(&self.index)
            .map_err(|e| CacheError::Corrupt(self.file.clone(), e))?;

        let tmp = self.file.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(io_err)?;
        fs::rename(&tmp, &self.file).map_err(io_err)?;

        let saved = self.index.entries.len();
        crate::debug!("cache"; "persisted {} entries to {}", saved, self.file.display());
        Ok(saved)
    }

    pub fn len(&self) -> usize {
        self.index.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.entries.is_empty()
    }

    /// Location of the index file.
    pub fn file(&self) -> &Path {
        &self.file
    }
}

/// Load cache index from disk
fn load_index(path: &Path) -> Result<CacheIndex, CacheError> {
    if !path.exists() {
        return Ok(CacheIndex::default());
    }

    let json = fs::read_to_string(path).map_err(|e| CacheError::Io(path.to_path_buf(), e))?;
    let index: CacheIndex =
        serde_json::from_str(&json).map_err(|e| CacheError::Corrupt(path.to_path_buf(), e))?;

    if index.version > INDEX_VERSION {
        return Err(CacheError::Version(path.to_path_buf(), index.version));
    }

    Ok(index)
}
