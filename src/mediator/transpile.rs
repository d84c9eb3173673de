//! Compilation passes and artifact emission.

use std::fs;
use std::path::Path;

use crate::cache::Freshness;
use crate::compiler::TranspiledUnit;
use crate::core::RenderMode;
use crate::error::{BuildError, Result};

use super::{Mediator, Progress};

impl Mediator {
    /// Compile every file that is not cached, once per pass.
    ///
    /// Passes come from the build context: the client pass always, then the
    /// server-render pass when SSR is on. Cache rows are committed before a
    /// file's first compile, once its output route is known. Returns the
    /// number of files compiled per pass.
    pub fn transpile(&mut self) -> Result<usize> {
        self.require(Progress::Prepared, "transpile")?;
        let table = self.address_table("transpile")?;
        let cache = self
            .state
            .cache
            .as_mut()
            .ok_or(BuildError::Stage("transpile", "prepare"))?;

        self.state.client.clear();
        self.state.server.clear();

        for &mode in self.context.passes() {
            for pending in &self.state.work {
                let route = &pending.file.route;

                if mode == RenderMode::Client {
                    match &pending.freshness {
                        Freshness::Update { hash, .. } => cache.commit_update(route, *hash)?,
                        Freshness::Insert { hash } => {
                            cache.commit_insert(route.clone(), *hash, table.output_or_self(route))
                        }
                        Freshness::Unchanged { .. } => {}
                    }
                }

                let compiled = self
                    .transpilers
                    .compile(&pending.file, mode)
                    .map_err(|source| BuildError::Compile {
                        route: route.clone(),
                        mode,
                        source,
                    })?;
                let unit = table.finalize(&pending.file, compiled);

                match mode {
                    RenderMode::Client => self.state.client.push(unit),
                    RenderMode::Server => {
                        self.state.server.insert(unit.path.clone(), unit);
                    }
                }
            }

            crate::debug!("build"; "{} pass: {} files", mode, self.state.work.len());
        }

        self.state.progress = Progress::Transpiled;
        Ok(self.state.work.len())
    }

    /// Write every unit under its output root. Returns the number of files written.
    pub fn to_fs(&mut self) -> Result<usize> {
        self.require(Progress::Transpiled, "to_fs")?;

        let client_root = self.output_dir();
        for unit in &self.state.client {
            write_unit(&client_root, unit)?;
        }

        let ssr_root = self.ssr_output_dir();
        for unit in self.state.server.values() {
            write_unit(&ssr_root, unit)?;
        }

        let written = self.state.client.len() + self.state.server.len();
        crate::debug!("build"; "wrote {} files", written);

        self.state.progress = Progress::Emitted;
        Ok(written)
    }
}

fn write_unit(root: &Path, unit: &TranspiledUnit) -> Result<()> {
    let path = root.join(unit.path.to_fs_relative());
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| BuildError::Emit(parent.to_path_buf(), e))?;
    }
    fs::write(&path, &unit.content).map_err(|e| BuildError::Emit(path, e))
}
