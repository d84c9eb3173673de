//! Transpiler registry: source extension -> compile function + output extension.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::core::RenderMode;
use crate::scan::SourceFile;

/// A per-extension compiler.
///
/// Implemented for any `Fn(&SourceFile, RenderMode) -> anyhow::Result<String>`.
pub trait Transpile: Send + Sync {
    fn compile(&self, file: &SourceFile, mode: RenderMode) -> anyhow::Result<String>;
}

impl<F> Transpile for F
where
    F: Fn(&SourceFile, RenderMode) -> anyhow::Result<String> + Send + Sync,
{
    fn compile(&self, file: &SourceFile, mode: RenderMode) -> anyhow::Result<String> {
        self(file, mode)
    }
}

struct Registration {
    output_extension: String,
    transpiler: Arc<dyn Transpile>,
}

/// Compiled output of one file before dependency resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Compiled {
    /// Produced by a registered transpiler.
    Text(String),
    /// No transpiler registered; raw source bytes pass through.
    Raw(Vec<u8>),
}

/// Maps source extensions to transpilers.
#[derive(Default)]
pub struct TranspilerRegistry {
    handlers: FxHashMap<String, Registration>,
}

impl TranspilerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a compile function for files ending in `.{extension}`,
    /// producing `.{output_extension}` files. Re-registering replaces the handler.
    pub fn register<F>(
        &mut self,
        extension: impl Into<String>,
        output_extension: impl Into<String>,
        compile: F,
    ) where
        F: Fn(&SourceFile, RenderMode) -> anyhow::Result<String> + Send + Sync + 'static,
    {
        self.register_transpiler(extension, output_extension, compile);
    }

    /// Register a [`Transpile`] implementor.
    pub fn register_transpiler(
        &mut self,
        extension: impl Into<String>,
        output_extension: impl Into<String>,
        transpiler: impl Transpile + 'static,
    ) {
        self.handlers.insert(
            extension.into(),
            Registration {
                output_extension: output_extension.into(),
                transpiler: Arc::new(transpiler),
            },
        );
    }

    /// Output extension for a source extension, if a transpiler is registered.
    pub fn output_extension(&self, extension: &str) -> Option<&str> {
        self.handlers
            .get(extension)
            .map(|r| r.output_extension.as_str())
    }

    pub fn has(&self, extension: &str) -> bool {
        self.handlers.contains_key(extension)
    }

    /// Extension -> output extension table, used to assign output paths.
    pub fn output_extensions(&self) -> FxHashMap<String, String> {
        self.handlers
            .iter()
            .map(|(ext, r)| (ext.clone(), r.output_extension.clone()))
            .collect()
    }

    /// Compile one file for `mode`.
    ///
    /// Files without a registered transpiler are read and passed through verbatim.
    pub fn compile(&self, file: &SourceFile, mode: RenderMode) -> anyhow::Result<Compiled> {
        match file.extension().and_then(|ext| self.handlers.get(ext)) {
            Some(registration) => registration
                .transpiler
                .compile(file, mode)
                .map(Compiled::Text),
            None => {
                let bytes = std::fs::read(&file.path)?;
                Ok(Compiled::Raw(bytes))
            }
        }
    }
}
