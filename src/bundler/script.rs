//! Default bundler: applies load interceptors and renders each entry.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;

use super::minify::minify;
use super::{Bundler, BundlerPlugin, LoadResult, Loader, PluginBuild};

/// Renders each entry on its own: the first matching load interceptor
/// supplies its contents, otherwise the file is read from disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptBundler {
    minify: bool,
}

impl ScriptBundler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_minify(mut self, minify: bool) -> Self {
        self.minify = minify;
        self
    }
}

#[async_trait]
impl Bundler for ScriptBundler {
    async fn bundle(
        &self,
        entries: &[PathBuf],
        plugins: &[Arc<dyn BundlerPlugin>],
    ) -> Result<Vec<String>> {
        let build = PluginBuild::from_plugins(plugins);
        let mut outputs = Vec::with_capacity(entries.len());

        for entry in entries {
            let loaded = match build.load(entry) {
                Some(result) => result.with_context(|| format!("plugin failed on {}", entry.display()))?,
                None => read_entry(entry).await?,
            };

            let (loader, code) = render(loaded)
                .with_context(|| format!("failed to render {}", entry.display()))?;
            outputs.push(if self.minify { minify(loader, code) } else { code });
        }

        Ok(outputs)
    }
}

async fn read_entry(path: &Path) -> Result<LoadResult> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let loader = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(Loader::from_extension)
        .unwrap_or_default();
    Ok(LoadResult { contents, loader })
}

/// Turn loaded contents into bundle output. Stylesheets stay CSS; text and
/// JSON become ES modules with a default export.
fn render(loaded: LoadResult) -> Result<(Loader, String)> {
    match loaded.loader {
        Loader::Js => Ok((Loader::Js, loaded.contents)),
        Loader::Css => Ok((Loader::Css, loaded.contents)),
        Loader::Text => {
            let literal = serde_json::to_string(&loaded.contents)?;
            Ok((Loader::Js, format!("export default {literal};\n")))
        }
        Loader::Json => {
            let value: serde_json::Value = serde_json::from_str(&loaded.contents)?;
            Ok((Loader::Js, format!("export default {value};\n")))
        }
    }
}
