//! Bundler plugins: load interception by path pattern.

use std::path::Path;
use std::sync::Arc;

use regex::Regex;

/// How loaded contents are interpreted by the bundler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Loader {
    #[default]
    Js,
    Css,
    Text,
    Json,
}

impl Loader {
    /// Default loader for a file extension.
    pub fn from_extension(ext: &str) -> Self {
        match ext {
            "css" => Self::Css,
            "json" => Self::Json,
            "txt" | "html" | "svg" | "md" => Self::Text,
            _ => Self::Js,
        }
    }
}

/// Arguments passed to a load interceptor.
#[derive(Debug, Clone, Copy)]
pub struct LoadArgs<'a> {
    pub path: &'a Path,
}

/// Replacement contents returned by a load interceptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadResult {
    pub contents: String,
    pub loader: Loader,
}

impl LoadResult {
    pub fn js(contents: impl Into<String>) -> Self {
        Self {
            contents: contents.into(),
            loader: Loader::Js,
        }
    }
}

type LoadCallback = Arc<dyn Fn(LoadArgs<'_>) -> anyhow::Result<LoadResult> + Send + Sync>;

struct Interceptor {
    plugin: String,
    filter: Regex,
    callback: LoadCallback,
}

/// A registrable bundler extension.
pub trait BundlerPlugin: Send + Sync {
    fn name(&self) -> &str;

    /// Register load interceptors on `build`.
    fn setup(&self, build: &mut PluginBuild);
}

/// Build context handed to [`BundlerPlugin::setup`].
#[derive(Default)]
pub struct PluginBuild {
    interceptors: Vec<Interceptor>,
    current: String,
}

impl PluginBuild {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `setup` of every plugin in order.
    pub fn from_plugins(plugins: &[Arc<dyn BundlerPlugin>]) -> Self {
        let mut build = Self::new();
        for plugin in plugins {
            build.current = plugin.name().to_string();
            plugin.setup(&mut build);
        }
        build.current.clear();
        build
    }

    /// Intercept loads of paths matching `filter`.
    pub fn on_load<F>(&mut self, filter: Regex, callback: F)
    where
        F: Fn(LoadArgs<'_>) -> anyhow::Result<LoadResult> + Send + Sync + 'static,
    {
        self.interceptors.push(Interceptor {
            plugin: self.current.clone(),
            filter,
            callback: Arc::new(callback),
        });
    }

    /// Apply the first interceptor whose filter matches `path`.
    ///
    /// `None` when no interceptor matches.
    pub fn load(&self, path: &Path) -> Option<anyhow::Result<LoadResult>> {
        let display = path.to_string_lossy();
        let interceptor = self
            .interceptors
            .iter()
            .find(|i| i.filter.is_match(&display))?;

        crate::debug!("bundle"; "{} intercepts {}", interceptor.plugin, display);
        Some((interceptor.callback)(LoadArgs { path }))
    }

    pub fn len(&self) -> usize {
        self.interceptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interceptors.is_empty()
    }
}
