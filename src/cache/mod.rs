//! Content cache persistence.
//!
//! Classifies each discovered file as unchanged / updated / new and keeps
//! the route -> output path assignment stable across builds.

mod index;
mod store;

use std::path::PathBuf;

use thiserror::Error;

use crate::core::Route;

/// Cache directory name (inside the build directory)
pub(crate) const CACHE_DIR: &str = "cache";

pub use index::CacheEntry;
pub use store::{ContentCache, Freshness};

/// Cache-related errors. All of them abort the build.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("IO error on cache index `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("corrupt cache index `{0}`")]
    Corrupt(PathBuf, #[source] serde_json::Error),

    #[error("cache index `{0}` has unsupported version {1}")]
    Version(PathBuf, u32),

    #[error("no cache entry for route `{0}`")]
    UnknownRoute(Route),
}
