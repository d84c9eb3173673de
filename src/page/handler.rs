//! Page handler registry: extension -> shell builder (+ optional server renderer).

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::core::Route;

/// Input for a page shell builder.
#[derive(Debug, Clone, Copy)]
pub struct PageInput<'a> {
    /// Output route of the compiled page module (`/blog/index.js`)
    pub route: &'a Route,
    /// Location of the compiled module on disk
    pub output: &'a Path,
}

/// Input for a server-render builder.
#[derive(Debug, Clone, Copy)]
pub struct SsrInput<'a> {
    /// Source extension of the page
    pub extension: &'a str,
    /// Page directory route the provider is registered under
    pub dir_route: &'a Route,
    /// Requested route (may differ from `dir_route` for dynamic routes)
    pub route: &'a str,
    /// Client page shell to splice markup into
    pub shell: &'a str,
    /// Server-render module on disk
    pub ssr_output: &'a Path,
}

/// Builds the HTML document for a page. `None` means no page.
pub type ShellBuilder = Arc<dyn Fn(PageInput<'_>) -> anyhow::Result<Option<String>> + Send + Sync>;

/// Renders markup for a requested route. `None` renders an empty body.
pub type SsrBuilder = Arc<dyn Fn(SsrInput<'_>) -> anyhow::Result<Option<String>> + Send + Sync>;

/// Owned arguments captured by a lazy render provider.
#[derive(Debug, Clone)]
pub(crate) struct SsrTarget {
    pub extension: String,
    pub dir_route: Route,
    pub shell: String,
    pub ssr_output: PathBuf,
}

/// Maps page extensions to shell and server-render builders.
#[derive(Default, Clone)]
pub struct PageHandlerRegistry {
    shells: FxHashMap<String, ShellBuilder>,
    renderers: FxHashMap<String, SsrBuilder>,
}

impl PageHandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the shell builder for `extension`.
    pub fn register<F>(&mut self, extension: impl Into<String>, build: F)
    where
        F: Fn(PageInput<'_>) -> anyhow::Result<Option<String>> + Send + Sync + 'static,
    {
        self.shells.insert(extension.into(), Arc::new(build));
    }

    /// Register the server-render builder for `extension`.
    pub fn register_ssr<F>(&mut self, extension: impl Into<String>, render: F)
    where
        F: Fn(SsrInput<'_>) -> anyhow::Result<Option<String>> + Send + Sync + 'static,
    {
        self.renderers.insert(extension.into(), Arc::new(render));
    }

    pub fn has_shell(&self, extension: &str) -> bool {
        self.shells.contains_key(extension)
    }

    /// Build the page shell. `Ok(None)` when no handler is registered or the
    /// handler declines.
    pub fn build_shell(&self, extension: &str, input: PageInput<'_>) -> anyhow::Result<Option<String>> {
        match self.shells.get(extension) {
            Some(build) => build(input),
            None => Ok(None),
        }
    }

    pub(crate) fn renderer(&self, extension: &str) -> Option<SsrBuilder> {
        self.renderers.get(extension).cloned()
    }

    /// Invoke the server-render builder for a target.
    pub(crate) fn render(
        renderer: &SsrBuilder,
        target: &SsrTarget,
        route: &str,
    ) -> anyhow::Result<Option<String>> {
        renderer(SsrInput {
            extension: &target.extension,
            dir_route: &target.dir_route,
            route,
            shell: &target.shell,
            ssr_output: &target.ssr_output,
        })
    }
}
