//! The final route table handed to the serving layer.

use std::fmt;
use std::path::PathBuf;

use crate::core::Route;
use crate::page::RenderFn;

use super::{Mediator, PAGE_DOCUMENT};

/// What a route serves.
#[derive(Clone)]
pub enum RouteContent {
    /// Bytes as written to disk (empty for static page directories).
    Static(Vec<u8>),
    /// Lazily rendered markup for a requested route.
    Render(RenderFn),
}

impl RouteContent {
    pub fn is_render(&self) -> bool {
        matches!(self, Self::Render(_))
    }

    /// Content for `route`: static bytes as text, or rendered markup.
    pub fn resolve(&self, route: &str) -> String {
        match self {
            Self::Static(bytes) => String::from_utf8_lossy(bytes).into_owned(),
            Self::Render(render) => render(route),
        }
    }
}

impl fmt::Debug for RouteContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(bytes) => f.debug_tuple("Static").field(&bytes.len()).finish(),
            Self::Render(_) => f.write_str("Render(..)"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RouteEntry {
    pub route: Route,
    pub content: RouteContent,
    /// File on disk backing the route
    pub path: Option<PathBuf>,
    /// Source route the entry was compiled from
    pub original: Option<Route>,
}

impl Mediator {
    /// Every servable route of the current build.
    ///
    /// Compiled and reused files come first, then pages: render providers
    /// in server-render mode, page documents otherwise.
    pub fn route_table(&self) -> Vec<RouteEntry> {
        let output_dir = self.output_dir();
        let units = self
            .state
            .client
            .iter()
            .chain(self.state.reused.iter().map(|r| &r.unit));

        let mut table: Vec<RouteEntry> = units
            .map(|unit| RouteEntry {
                route: unit.path.clone(),
                content: RouteContent::Static(unit.content.clone()),
                path: Some(output_dir.join(unit.path.to_fs_relative())),
                original: Some(unit.original.clone()),
            })
            .collect();

        if self.context.ssr {
            table.extend(self.state.renderers.iter().map(|(dir, render)| RouteEntry {
                route: dir.clone(),
                content: RouteContent::Render(render.clone()),
                path: None,
                original: None,
            }));
        } else {
            table.extend(self.state.pages.iter().map(|dir| RouteEntry {
                route: dir.clone(),
                content: RouteContent::Static(Vec::new()),
                path: Some(output_dir.join(dir.to_fs_relative()).join(PAGE_DOCUMENT)),
                original: None,
            }));
        }

        table
    }
}
