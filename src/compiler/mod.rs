//! Per-extension compilation.

mod registry;
mod unit;

pub use registry::{Compiled, Transpile, TranspilerRegistry};
pub use unit::TranspiledUnit;
