//! Declaration emission.

use std::fs;
use std::path::{Component, Path};

use rustc_hash::FxHashSet;

use crate::core::is_script_extension;
use crate::error::{BuildError, Result};
use crate::typegen::{
    PAGES_DECLARATION, ROOT_DECLARATION, TSCONFIG, TsGenerator, TsModule, TsReference, TsTree,
};

use super::{Mediator, Progress};

impl Mediator {
    /// Write `kiln.d.ts`, `types/pages.d.ts` and `tsconfig.json` into the
    /// build directory.
    ///
    /// Every compiled or reused source whose extension has a registered
    /// declaration gets a module entry; script sources are skipped.
    pub fn type_gen(&self) -> Result<TsGenerator> {
        self.require(Progress::Transpiled, "type_gen")?;
        let table = self.address_table("type_gen")?;

        let mut originals: Vec<_> = self
            .state
            .client
            .iter()
            .chain(self.state.reused.iter().map(|r| &r.unit))
            .map(|unit| &unit.original)
            .filter(|original| table.has_declaration(original))
            .collect();
        originals.sort();
        originals.dedup();

        let mut pages = TsTree::default();
        let mut referenced = FxHashSet::default();
        for original in originals {
            let Some(ext) = original.extension() else {
                continue;
            };
            if is_script_extension(ext) {
                continue;
            }
            if referenced.insert(ext) {
                for reference in self.types.imports_by_extension.get(ext).into_iter().flatten() {
                    pages.reference(reference.clone());
                }
            }
            pages.modules.push(TsModule {
                name: original.to_string(),
                content: self.types.by_extension.get(ext).into_iter().cloned().collect(),
                globals: Vec::new(),
            });
        }

        let mut root = TsTree {
            imports: self.types.imports.clone(),
            globals: self.types.globals.clone(),
            modules: self.types.modules.clone(),
            ..TsTree::default()
        };
        root.reference(TsReference::Path(PAGES_DECLARATION.to_string()));
        for reference in &self.types.references {
            root.reference(reference.clone());
        }

        let mut generator = TsGenerator::new();
        generator.declare(PAGES_DECLARATION, pages);
        generator.declare(ROOT_DECLARATION, root);

        for path in generator.paths() {
            if let Some(text) = generator.render(path) {
                self.write_declaration(path, &text)?;
            }
        }
        let sources = self.source_globs();
        self.write_declaration(TSCONFIG, &generator.tsconfig(&sources))?;

        crate::debug!("build"; "wrote declarations to {}", self.build_dir.display());
        Ok(generator)
    }

    fn write_declaration(&self, relative: &str, text: &str) -> Result<()> {
        let path = self.build_dir.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| BuildError::Declaration(parent.to_path_buf(), e))?;
        }
        fs::write(&path, text).map_err(|e| BuildError::Declaration(path, e))
    }

    /// Source roots as tsconfig globs, relative to the build directory.
    fn source_globs(&self) -> Vec<String> {
        let prefix = match self.build_dir.strip_prefix(&self.root) {
            Ok(relative) => "../".repeat(depth(relative)),
            Err(_) => format!("{}/", self.root.display()),
        };
        self.state
            .dirs
            .iter()
            .map(|dir| {
                let dir = dir.to_string_lossy();
                format!("{prefix}{}/**/*", dir.trim_end_matches('/'))
            })
            .collect()
    }
}

fn depth(relative: &Path) -> usize {
    relative
        .components()
        .filter(|c| matches!(c, Component::Normal(_)))
        .count()
}
