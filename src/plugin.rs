//! Plugin sets handed to the bundler.
//!
//! Two independent sets: bundler plugins run when page dependencies are
//! bundled for output; server plugins run when sources are served directly.

use std::sync::Arc;

use crate::bundler::BundlerPlugin;

#[derive(Default, Clone)]
pub struct PluginManager {
    bundler: Vec<Arc<dyn BundlerPlugin>>,
    server: Vec<Arc<dyn BundlerPlugin>>,
}

impl PluginManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a bundler plugin, replacing any plugin with the same name.
    pub fn set_bundler_plugin(&mut self, plugin: impl BundlerPlugin + 'static) {
        upsert(&mut self.bundler, Arc::new(plugin));
    }

    /// Add a server plugin, replacing any plugin with the same name.
    pub fn set_server_plugin(&mut self, plugin: impl BundlerPlugin + 'static) {
        upsert(&mut self.server, Arc::new(plugin));
    }

    pub fn bundler_plugins(&self) -> &[Arc<dyn BundlerPlugin>] {
        &self.bundler
    }

    pub fn server_plugins(&self) -> &[Arc<dyn BundlerPlugin>] {
        &self.server
    }
}

fn upsert(set: &mut Vec<Arc<dyn BundlerPlugin>>, plugin: Arc<dyn BundlerPlugin>) {
    match set.iter_mut().find(|p| p.name() == plugin.name()) {
        Some(slot) => *slot = plugin,
        None => set.push(plugin),
    }
}
