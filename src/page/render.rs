//! Lazy server-render providers and their per-route markup cache.

use std::sync::Arc;

use dashmap::DashMap;

use super::handler::{PageHandlerRegistry, SsrBuilder, SsrTarget};

/// Lazily renders markup for a requested route.
pub type RenderFn = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Rendered markup keyed by requested route (not by page template, since
/// one template may serve many dynamic routes).
#[derive(Debug, Clone, Default)]
pub struct SsrCache(Arc<DashMap<String, String>>);

impl SsrCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, route: &str) -> Option<String> {
        self.0.get(route).map(|r| r.value().clone())
    }

    pub fn set(&self, route: &str, markup: String) {
        self.0.insert(route.to_string(), markup);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&self) {
        self.0.clear();
    }
}

/// Build a memoized render provider for one page.
///
/// On a cache miss the renderer runs once and its markup is cached for the
/// requested route. `None` or an error yields an empty body and is not
/// cached. Without a renderer the client shell is served as-is.
pub(crate) fn render_provider(
    renderer: Option<SsrBuilder>,
    target: SsrTarget,
    cache: SsrCache,
) -> RenderFn {
    let Some(renderer) = renderer else {
        let shell = target.shell;
        return Arc::new(move |_: &str| shell.clone());
    };

    Arc::new(move |route: &str| {
        if let Some(markup) = cache.get(route) {
            return markup;
        }

        match PageHandlerRegistry::render(&renderer, &target, route) {
            Ok(Some(markup)) => {
                cache.set(route, markup.clone());
                markup
            }
            Ok(None) => String::new(),
            Err(e) => {
                crate::log!("error"; "server render of {} failed: {:#}", route, e);
                String::new()
            }
        }
    })
}
