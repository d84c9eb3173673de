//! Bundled plugins.

pub mod css;
