//! Source discovery.
//!
//! Recursively walks each configured source root and yields one
//! [`SourceFile`] per file, routed relative to its root:
//!
//! ```text
//! public/
//! ├── index.svelte        -> /index.svelte
//! ├── app.css             -> /app.css
//! └── blog/
//!     └── index.svelte    -> /blog/index.svelte
//! ```

use std::io;
use std::path::{Path, PathBuf};

use jwalk::WalkDir;

use crate::core::Route;
use crate::error::BuildError;

const IGNORED_FILES: &[&str] = &[".DS_Store"];

/// A discovered source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Web-facing route, relative to the source root
    pub route: Route,
    /// Absolute filesystem location
    pub path: PathBuf,
}

impl SourceFile {
    pub fn new(route: impl Into<Route>, path: impl Into<PathBuf>) -> Self {
        Self {
            route: route.into(),
            path: path.into(),
        }
    }

    /// Source extension (without the dot).
    pub fn extension(&self) -> Option<&str> {
        self.route.extension()
    }
}

/// Discover all files under `dirs` (each relative to `root`).
///
/// Any unreadable directory entry aborts discovery.
pub fn discover(root: &Path, dirs: &[PathBuf]) -> Result<Vec<SourceFile>, BuildError> {
    let mut files = Vec::new();
    for dir in dirs {
        let base = root.join(dir);
        walk_root(&base, &mut files)?;
    }
    Ok(files)
}

/// Walk one source root in sorted order, dot-entries included.
///
/// File names must be valid UTF-8: routes are text, and a lossy conversion
/// could map two files onto one route.
fn walk_root(base: &Path, files: &mut Vec<SourceFile>) -> Result<(), BuildError> {
    if !base.is_dir() {
        return Err(BuildError::Discovery(
            base.to_path_buf(),
            io::Error::new(io::ErrorKind::NotFound, "source directory not found"),
        ));
    }

    for entry in WalkDir::new(base).sort(true).skip_hidden(false) {
        let entry = entry.map_err(|e| {
            let path = e.path().map_or_else(|| base.to_path_buf(), Path::to_path_buf);
            BuildError::Discovery(path, io::Error::other(e.to_string()))
        })?;

        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if IGNORED_FILES.contains(&entry.file_name().to_str().unwrap_or_default()) {
            continue;
        }

        let rel = path.strip_prefix(base).unwrap_or(&path);
        if rel.to_str().is_none() {
            return Err(BuildError::Discovery(
                path.clone(),
                io::Error::new(io::ErrorKind::InvalidData, "file name is not valid UTF-8"),
            ));
        }
        files.push(SourceFile {
            route: Route::from_relative(rel),
            path: path.clone(),
        });
    }

    Ok(())
}
