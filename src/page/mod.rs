//! Page shells and server-render providers.

mod handler;
mod render;

pub use handler::{PageHandlerRegistry, PageInput, ShellBuilder, SsrBuilder, SsrInput};
pub use render::{RenderFn, SsrCache};

pub(crate) use handler::SsrTarget;
pub(crate) use render::render_provider;

use crate::core::Route;

/// A page staged for bundling.
#[derive(Debug, Clone)]
pub struct GeneratedPage {
    /// HTML shell
    pub code: String,
    /// Output routes of the client bundles the shell loads
    pub deps: Vec<Route>,
    /// Output route of the compiled page module
    pub route: Route,
}

impl GeneratedPage {
    /// Directory route the page is served under.
    pub fn dir(&self) -> Route {
        self.route.dir()
    }
}
