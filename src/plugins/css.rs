//! Stylesheets as script modules.
//!
//! When bundled, a `.css` file becomes a module that appends a `<style>`
//! element to the document head. When served directly, it resolves to an
//! inert placeholder module.

use std::sync::LazyLock;

use anyhow::Context;
use regex::Regex;

use crate::bundler::{BundlerPlugin, LoadResult, PluginBuild};
use crate::plugin::PluginManager;

static CSS_FILTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.css$").unwrap_or_else(|e| panic!("invalid css filter: {e}")));

const PLACEHOLDER: &str = "export default {};\n";

/// Register both halves of the plugin.
pub fn install(plugins: &mut PluginManager) {
    plugins.set_bundler_plugin(StyleInjection);
    plugins.set_server_plugin(StylePlaceholder);
}

/// Wraps stylesheet text in a style-injecting module.
pub fn injection_module(css: &str) -> anyhow::Result<String> {
    let literal = serde_json::to_string(css)?;
    Ok(format!(
        "const style = document.createElement(\"style\");\n\
         style.type = \"text/css\";\n\
         style.appendChild(document.createTextNode({literal}));\n\
         document.head.appendChild(style);\n"
    ))
}

pub struct StyleInjection;

impl BundlerPlugin for StyleInjection {
    fn name(&self) -> &str {
        "css"
    }

    fn setup(&self, build: &mut PluginBuild) {
        build.on_load(CSS_FILTER.clone(), |args| {
            let css = std::fs::read_to_string(args.path)
                .with_context(|| format!("failed to read {}", args.path.display()))?;
            Ok(LoadResult::js(injection_module(&css)?))
        });
    }
}

pub struct StylePlaceholder;

impl BundlerPlugin for StylePlaceholder {
    fn name(&self) -> &str {
        "css"
    }

    fn setup(&self, build: &mut PluginBuild) {
        build.on_load(CSS_FILTER.clone(), |_| Ok(LoadResult::js(PLACEHOLDER)));
    }
}
