//! Bundling of page client dependencies.
//!
//! - [`Bundler`]: the bundling seam; [`ScriptBundler`] is the default
//! - [`BundlerPlugin`] / [`PluginBuild`]: load interception by path pattern
//! - [`minify`]: oxc / lightningcss minification

pub mod minify;
mod plugin;
mod script;

pub use plugin::{BundlerPlugin, LoadArgs, LoadResult, Loader, PluginBuild};
pub use script::ScriptBundler;

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;

/// Produces bundled artifacts for resolved output files.
///
/// Returns one output per entry, in entry order.
#[async_trait]
pub trait Bundler: Send + Sync {
    async fn bundle(
        &self,
        entries: &[PathBuf],
        plugins: &[Arc<dyn BundlerPlugin>],
    ) -> anyhow::Result<Vec<String>>;
}
