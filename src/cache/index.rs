//! Cache index data structures.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::Route;
use crate::freshness::ContentHash;

/// Index file name
pub const INDEX_FILE: &str = "index.json";

/// Current on-disk format version.
pub const INDEX_VERSION: u32 = 1;

/// A cached route: content checksum plus its assigned output path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Source content hash (blake3 hex)
    pub hash: ContentHash,
    /// Output route assigned when the entry was inserted
    pub path: Route,
    /// Output on disk must be rebuilt even if the hash matches
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub stale: bool,
}

/// Index mapping source routes to cache entries.
#[derive(Debug, Serialize, Deserialize)]
pub struct CacheIndex {
    #[serde(default)]
    pub version: u32,
    /// Source route -> cache entry
    #[serde(default)]
    pub entries: FxHashMap<Route, CacheEntry>,
    /// Last write time (Unix timestamp in seconds)
    #[serde(default)]
    pub updated_at: u64,
}

impl Default for CacheIndex {
    fn default() -> Self {
        Self {
            version: INDEX_VERSION,
            entries: FxHashMap::default(),
            updated_at: 0,
        }
    }
}

impl CacheIndex {
    /// Stamp the index with the current time before writing.
    pub fn touch(&mut self) {
        self.updated_at = current_timestamp();
    }
}

/// Get current Unix timestamp in seconds
fn current_timestamp() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
