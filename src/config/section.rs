//! `[build]` section configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Build settings.
///
/// # Example
/// ```toml
/// [build]
/// dirs = ["public"]
/// output = ".kiln"
/// ssr = false
/// minify = false
/// timeout = 300
/// prune = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildSection {
    /// Source roots, relative to the project root.
    pub dirs: Vec<PathBuf>,

    /// Build directory (holds `output/`, `output-ssr/`, `cache/` and declarations).
    pub output: PathBuf,

    /// Run the server-render pass.
    pub ssr: bool,

    /// Minify bundled page dependencies.
    pub minify: bool,

    /// Build deadline in seconds; `0` disables it.
    pub timeout: u64,

    /// Drop cache rows of routes no longer discovered.
    pub prune: bool,

    /// Remove the build directory before building.
    #[serde(skip)]
    pub clean: bool,
}

impl Default for BuildSection {
    fn default() -> Self {
        Self {
            dirs: vec![PathBuf::from("public")],
            output: PathBuf::from(".kiln"),
            ssr: false,
            minify: false,
            timeout: 300,
            prune: true,
            clean: false,
        }
    }
}
