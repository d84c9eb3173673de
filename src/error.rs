//! Build error taxonomy.
//!
//! Every variant aborts the build. Per-page failures (missing handlers,
//! shell builder errors, bundling errors) are logged and never surface here.

use std::path::PathBuf;

use thiserror::Error;

use crate::cache::CacheError;
use crate::core::Route;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("failed to read `{0}`")]
    Discovery(PathBuf, #[source] std::io::Error),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error("failed to compile `{route}` ({mode} pass)")]
    Compile {
        route: Route,
        mode: crate::core::RenderMode,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to write `{0}`")]
    Emit(PathBuf, #[source] std::io::Error),

    #[error("failed to write declarations to `{0}`")]
    Declaration(PathBuf, #[source] std::io::Error),

    #[error("`{0}` called before `{1}`")]
    Stage(&'static str, &'static str),

    #[error("build deadline exceeded after {0:?}")]
    DeadlineExceeded(std::time::Duration),
}

pub type Result<T, E = BuildError> = std::result::Result<T, E>;
