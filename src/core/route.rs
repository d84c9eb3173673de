//! Route type for web-facing asset paths.
//!
//! A route is the URL-style path of a discovered source file or of its
//! compiled output, relative to its root (`/blog/index.svelte`, `/app.js`).

use std::borrow::Borrow;
use std::path::{Component, Path};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Normalized route path.
///
/// Invariants:
/// - Always starts with `/`
/// - Uses `/` separators, never contains `.` or `..` segments
/// - Never ends with `/` unless it is the root
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Route(Arc<str>);

impl Route {
    /// Create from any slash-separated path, resolving `.` and `..` segments.
    pub fn new(path: &str) -> Self {
        let mut segments: Vec<&str> = Vec::new();
        for segment in path.split(['/', '\\']) {
            match segment {
                "" | "." => {}
                ".." => {
                    segments.pop();
                }
                s => segments.push(s),
            }
        }
        Self(Arc::from(format!("/{}", segments.join("/"))))
    }

    /// Create from a filesystem path relative to a source root.
    ///
    /// Non-UTF-8 segments are converted lossily; discovery rejects such
    /// names before they get here.
    pub fn from_relative(rel: &Path) -> Self {
        let joined = rel
            .components()
            .filter_map(|c| match c {
                Component::Normal(s) => Some(s.to_string_lossy()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/");
        Self::new(&joined)
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last path segment (`/blog/index.svelte` -> `index.svelte`).
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or_default()
    }

    /// Extension of the file name, without the dot.
    pub fn extension(&self) -> Option<&str> {
        let name = self.file_name();
        match name.rfind('.') {
            Some(0) | None => None,
            Some(idx) => Some(&name[idx + 1..]),
        }
    }

    /// File name with its extension stripped (`index.svelte` -> `index`).
    pub fn stem(&self) -> &str {
        let name = self.file_name();
        match name.rfind('.') {
            Some(0) | None => name,
            Some(idx) => &name[..idx],
        }
    }

    /// Parent directory route.
    ///
    /// `/blog/index.js` -> `/blog`, `/index.js` -> `/`, `/` -> `/`
    pub fn dir(&self) -> Self {
        match self.0.rfind('/') {
            Some(0) | None => Self(Arc::from("/")),
            Some(idx) => Self(Arc::from(&self.0[..idx])),
        }
    }

    /// Replace the extension (or append one when the file has none).
    pub fn with_extension(&self, ext: &str) -> Self {
        let base = match self.extension() {
            Some(old) => &self.0[..self.0.len() - old.len() - 1],
            None => &self.0,
        };
        Self(Arc::from(format!("{base}.{ext}")))
    }

    /// Append a raw suffix to the route (`/index.svelte` + `.js`).
    pub fn with_suffix(&self, suffix: &str) -> Self {
        Self(Arc::from(format!("{}{suffix}", self.0)))
    }

    /// Join a path segment onto this route treated as a directory.
    pub fn join(&self, path: &str) -> Self {
        if path.starts_with('/') {
            return Self::new(path);
        }
        Self::new(&format!("{}/{path}", self.0))
    }

    /// Relative reference from directory `from` to this route, always
    /// starting with `./` or `../` so bundlers never treat it as bare.
    pub fn relative_from(&self, from: &Route) -> String {
        let from_segments: Vec<&str> = from.segments().collect();
        let to_segments: Vec<&str> = self.segments().collect();

        let common = from_segments
            .iter()
            .zip(&to_segments)
            .take_while(|(a, b)| a == b)
            .count();

        let ups = from_segments.len() - common;
        let rest = to_segments[common..].join("/");

        if ups == 0 {
            format!("./{rest}")
        } else {
            format!("{}{rest}", "../".repeat(ups))
        }
    }

    /// Path relative to a filesystem root (no leading slash).
    pub fn to_fs_relative(&self) -> &str {
        self.0.trim_start_matches('/')
    }

    fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|s| !s.is_empty())
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Route {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Route {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Route {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Route {
    fn from(s: String) -> Self {
        Self::new(&s)
    }
}

impl PartialEq<str> for Route {
    fn eq(&self, other: &str) -> bool {
        self.0.as_ref() == other
    }
}

impl PartialEq<&str> for Route {
    fn eq(&self, other: &&str) -> bool {
        self.0.as_ref() == *other
    }
}

impl Serialize for Route {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Route {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::new(&s))
    }
}
