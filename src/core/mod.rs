//! Core types - pure abstractions shared across the codebase.

mod deadline;
mod mode;
mod route;

pub use deadline::Deadline;
pub use mode::{BuildContext, RenderMode};
pub use route::Route;

/// Extensions treated as raw scripts: compiled and bundled, never given a page shell.
pub const SCRIPT_EXTENSIONS: &[&str] = &["js", "ts", "mjs", "cjs"];

/// Check whether an extension names a raw script.
#[inline]
pub fn is_script_extension(ext: &str) -> bool {
    SCRIPT_EXTENSIONS.contains(&ext)
}
