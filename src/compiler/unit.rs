//! Transpiled unit: one compiled + dependency-resolved file for one pass.

use std::borrow::Cow;

use crate::core::Route;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranspiledUnit {
    /// Resolved output route
    pub path: Route,
    /// Final file content
    pub content: Vec<u8>,
    /// Source route the unit was compiled from
    pub original: Route,
}

impl TranspiledUnit {
    /// Content as text (lossy for binary passthrough files).
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.content)
    }
}
