//! Render mode and per-build context.

/// Target of a compilation pass.
///
/// Handlers branch on this instead of consulting ambient state: a UI
/// component compiler emits DOM-mutating code for `Client` and
/// markup-producing code for `Server`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RenderMode {
    /// Browser bundle pass.
    #[default]
    Client,
    /// Server-render pass.
    Server,
}

impl RenderMode {
    #[inline]
    pub const fn is_server(self) -> bool {
        matches!(self, Self::Server)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Server => "server",
        }
    }
}

impl std::fmt::Display for RenderMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build-wide settings that decide which passes run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BuildContext {
    /// Whether the server-render pass runs after the client pass.
    pub ssr: bool,
}

impl BuildContext {
    pub const STATIC: Self = Self { ssr: false };
    pub const SSR: Self = Self { ssr: true };

    /// Passes to sweep, client first.
    pub fn passes(&self) -> &'static [RenderMode] {
        if self.ssr {
            &[RenderMode::Client, RenderMode::Server]
        } else {
            &[RenderMode::Client]
        }
    }
}
