//! Path resolution: source routes <-> output routes.
//!
//! - [`table`]: Bijective route/output assignment and inverse lookup
//! - [`rewrite`]: Import rewriting and page dependency extraction

mod rewrite;
mod table;

pub use table::{AddressRequest, AddressTable};

use crate::compiler::{Compiled, TranspiledUnit};
use crate::core::{Route, is_script_extension};
use crate::scan::SourceFile;

impl AddressTable {
    /// Turn compiled output into a finalized unit at the file's output route.
    ///
    /// Transpiler output always has its imports rewritten; passthrough files
    /// only when they are UTF-8 scripts. Binary content is kept verbatim.
    pub fn finalize(&self, file: &SourceFile, compiled: Compiled) -> TranspiledUnit {
        let path = self
            .output_of(&file.route)
            .cloned()
            .unwrap_or_else(|| file.route.clone());

        let content = match compiled {
            Compiled::Text(code) => self.rewrite_imports(&file.route, &code).into_bytes(),
            Compiled::Raw(bytes) if file.extension().is_some_and(is_script_extension) => {
                match String::from_utf8(bytes) {
                    Ok(code) => self.rewrite_imports(&file.route, &code).into_bytes(),
                    Err(e) => e.into_bytes(),
                }
            }
            Compiled::Raw(bytes) => bytes,
        };

        TranspiledUnit {
            path,
            content,
            original: file.route.clone(),
        }
    }

    /// Output route for a source route, falling back to the route itself.
    pub fn output_or_self(&self, route: &Route) -> Route {
        self.output_of(route).cloned().unwrap_or_else(|| route.clone())
    }
}
