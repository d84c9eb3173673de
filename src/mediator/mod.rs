//! Build orchestration.
//!
//! # Pipeline
//!
//! ```text
//! prepare ──► transpile ──► to_fs ──► page_gen ──► type_gen ──► commit_cache
//!  discover    client pass    write     shells        .d.ts        persist
//!  classify    [server pass]  units     bundle deps   tsconfig     index.json
//!  assign                               providers
//! ```
//!
//! Every stage reads the [`AddressTable`] built during `prepare`; nothing
//! mutates it afterwards. The render mode is a loop variable of
//! `transpile`, never ambient state.

mod pages;
mod prepare;
mod routes;
mod transpile;
mod types;

#[cfg(test)]
mod tests;

pub use pages::PageReport;
pub use prepare::DiscoveryReport;
pub use routes::{RouteContent, RouteEntry};

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use rustc_hash::FxHashMap;

use crate::address::AddressTable;
use crate::bundler::{Bundler, ScriptBundler};
use crate::cache::{ContentCache, Freshness};
use crate::compiler::{TranspiledUnit, TranspilerRegistry};
use crate::config::KilnConfig;
use crate::core::{BuildContext, Deadline, RenderMode, Route};
use crate::error::{BuildError, Result};
use crate::page::{PageHandlerRegistry, PageInput, RenderFn, SsrCache, SsrInput};
use crate::plugin::PluginManager;
use crate::scan::SourceFile;
use crate::typegen::{TsDeclaration, TsModule, TsReference};

/// Client output tree, inside the build directory.
pub const OUTPUT_DIR: &str = "output";
/// Server-render output tree, inside the build directory.
pub const SSR_OUTPUT_DIR: &str = "output-ssr";
/// Page document written into every page directory.
pub const PAGE_DOCUMENT: &str = "index.html";

// =============================================================================
// State
// =============================================================================

/// How far the current build has progressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
enum Progress {
    #[default]
    Idle,
    Prepared,
    Transpiled,
    Emitted,
    Paged,
}

impl Progress {
    const fn stage(self) -> &'static str {
        match self {
            Self::Idle => "new",
            Self::Prepared => "prepare",
            Self::Transpiled => "transpile",
            Self::Emitted => "to_fs",
            Self::Paged => "page_gen",
        }
    }
}

/// A file to compile this build.
#[derive(Debug, Clone)]
struct Pending {
    file: SourceFile,
    freshness: Freshness,
}

/// An unchanged file, served from the previous build's output.
#[derive(Debug, Clone)]
struct Reused {
    file: SourceFile,
    unit: TranspiledUnit,
}

/// Per-build state, reset by `prepare`.
#[derive(Default)]
struct BuildState {
    progress: Progress,
    deadline: Option<Deadline>,
    dirs: Vec<PathBuf>,
    cache: Option<ContentCache>,
    table: Option<Arc<AddressTable>>,
    work: Vec<Pending>,
    reused: Vec<Reused>,
    /// Client pass units, in discovery order
    client: Vec<TranspiledUnit>,
    /// Server pass units keyed by output route
    server: BTreeMap<Route, TranspiledUnit>,
    /// Servable page directories (static mode)
    pages: BTreeSet<Route>,
    /// Render providers keyed by page directory (server-render mode)
    renderers: BTreeMap<Route, RenderFn>,
}

/// Declarations contributed by registered languages and plugins.
#[derive(Debug, Clone)]
struct TypeRegistry {
    by_extension: FxHashMap<String, TsDeclaration>,
    imports_by_extension: FxHashMap<String, Vec<TsReference>>,
    globals: Vec<TsDeclaration>,
    modules: Vec<TsModule>,
    references: Vec<TsReference>,
    imports: Vec<String>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self {
            by_extension: FxHashMap::default(),
            imports_by_extension: FxHashMap::default(),
            globals: vec![TsDeclaration::Const {
                name: "__KILN_SSR".into(),
                ty: "boolean".into(),
            }],
            modules: Vec::new(),
            references: Vec::new(),
            imports: Vec::new(),
        }
    }
}

/// Outcome of [`Mediator::build`].
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    pub discovery: DiscoveryReport,
    /// Units compiled per pass
    pub compiled: usize,
    /// Files written by `to_fs`, both trees
    pub written: usize,
    pub pages: PageReport,
    pub elapsed: Duration,
}

// =============================================================================
// Mediator
// =============================================================================

/// Owns every build component and drives the pipeline.
pub struct Mediator {
    root: PathBuf,
    build_dir: PathBuf,
    context: BuildContext,
    prune: bool,
    timeout: Option<Duration>,
    transpilers: TranspilerRegistry,
    pages: PageHandlerRegistry,
    plugins: PluginManager,
    bundler: Arc<dyn Bundler>,
    types: TypeRegistry,
    ssr_cache: SsrCache,
    state: BuildState,
}

impl Mediator {
    /// Mediator for the project at `root`, building into `<root>/.kiln`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            build_dir: root.join(".kiln"),
            root,
            context: BuildContext::default(),
            prune: true,
            timeout: None,
            transpilers: TranspilerRegistry::new(),
            pages: PageHandlerRegistry::new(),
            plugins: PluginManager::new(),
            bundler: Arc::new(ScriptBundler::new()),
            types: TypeRegistry::default(),
            ssr_cache: SsrCache::new(),
            state: BuildState::default(),
        }
    }

    pub fn from_config(config: &KilnConfig) -> Self {
        Self::new(config.root())
            .with_build_dir(config.build_dir())
            .with_ssr(config.build.ssr)
            .with_prune(config.build.prune)
            .with_timeout(config.timeout())
            .with_bundler(ScriptBundler::new().with_minify(config.build.minify))
    }

    /// Build directory; relative paths resolve against the project root.
    pub fn with_build_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.build_dir = self.root.join(dir);
        self
    }

    pub fn with_ssr(mut self, ssr: bool) -> Self {
        self.configure_ssr(ssr);
        self
    }

    pub fn with_prune(mut self, prune: bool) -> Self {
        self.prune = prune;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_bundler(mut self, bundler: impl Bundler + 'static) -> Self {
        self.bundler = Arc::new(bundler);
        self
    }

    pub fn configure_ssr(&mut self, ssr: bool) {
        self.context = BuildContext { ssr };
    }

    // -------------------------------------------------------------------------
    // Registration
    // -------------------------------------------------------------------------

    /// Compile `.{extension}` files to `.{output_extension}` with `compile`.
    pub fn declare_transpilation<F>(
        &mut self,
        extension: impl Into<String>,
        output_extension: impl Into<String>,
        compile: F,
    ) where
        F: Fn(&SourceFile, RenderMode) -> anyhow::Result<String> + Send + Sync + 'static,
    {
        self.transpilers.register(extension, output_extension, compile);
    }

    pub fn set_page_handler<F>(&mut self, extension: impl Into<String>, build: F)
    where
        F: Fn(PageInput<'_>) -> anyhow::Result<Option<String>> + Send + Sync + 'static,
    {
        self.pages.register(extension, build);
    }

    pub fn set_ssr_page_handler<F>(&mut self, extension: impl Into<String>, render: F)
    where
        F: Fn(SsrInput<'_>) -> anyhow::Result<Option<String>> + Send + Sync + 'static,
    {
        self.pages.register_ssr(extension, render);
    }

    /// Module declaration emitted for every source with this extension.
    pub fn set_type_gen(&mut self, extension: impl Into<String>, declaration: impl Into<TsDeclaration>) {
        self.types
            .by_extension
            .insert(extension.into(), declaration.into());
    }

    /// References pulled into the page declarations when this extension is present.
    pub fn set_type_imports(&mut self, extension: impl Into<String>, references: Vec<TsReference>) {
        self.types
            .imports_by_extension
            .insert(extension.into(), references);
    }

    pub fn add_global_declaration(&mut self, declaration: impl Into<TsDeclaration>) {
        self.types.globals.push(declaration.into());
    }

    pub fn add_module_declaration(&mut self, module: TsModule) {
        self.types.modules.push(module);
    }

    pub fn add_type_reference(&mut self, reference: TsReference) {
        self.types.references.push(reference);
    }

    pub fn add_type_import(&mut self, import: impl Into<String>) {
        self.types.imports.push(import.into());
    }

    pub fn transpilers_mut(&mut self) -> &mut TranspilerRegistry {
        &mut self.transpilers
    }

    pub fn page_handlers_mut(&mut self) -> &mut PageHandlerRegistry {
        &mut self.pages
    }

    pub fn plugins(&self) -> &PluginManager {
        &self.plugins
    }

    pub fn plugins_mut(&mut self) -> &mut PluginManager {
        &mut self.plugins
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn build_dir(&self) -> &Path {
        &self.build_dir
    }

    pub fn output_dir(&self) -> PathBuf {
        self.build_dir.join(OUTPUT_DIR)
    }

    pub fn ssr_output_dir(&self) -> PathBuf {
        self.build_dir.join(SSR_OUTPUT_DIR)
    }

    pub fn context(&self) -> BuildContext {
        self.context
    }

    pub fn ssr_cache(&self) -> &SsrCache {
        &self.ssr_cache
    }

    /// Cache of the current build, once prepared.
    pub fn cache(&self) -> Option<&ContentCache> {
        self.state.cache.as_ref()
    }

    /// Address table of the current build, once prepared.
    pub fn table(&self) -> Option<&AddressTable> {
        self.state.table.as_deref()
    }

    /// Client pass units of the current build.
    pub fn transpiled(&self) -> &[TranspiledUnit] {
        &self.state.client
    }

    /// Server pass units of the current build, ordered by output route.
    pub fn server_transpiled(&self) -> impl Iterator<Item = &TranspiledUnit> {
        self.state.server.values()
    }

    // -------------------------------------------------------------------------
    // Driver
    // -------------------------------------------------------------------------

    /// Run every stage under the configured deadline and persist the cache.
    ///
    /// The cache reaches disk only when every stage succeeded.
    pub async fn build(&mut self, dirs: &[PathBuf]) -> Result<BuildReport> {
        let deadline = Deadline::new(self.timeout);
        crate::log!("build"; "building {}{}", self.root.display(), if self.context.ssr { " (ssr)" } else { "" });

        let discovery = self.prepare(dirs)?;
        self.state.deadline = Some(deadline);
        self.check_deadline()?;

        let compiled = self.transpile()?;
        self.check_deadline()?;

        let written = self.to_fs()?;
        self.check_deadline()?;

        let pages = self.page_gen().await?;
        self.check_deadline()?;

        self.type_gen()?;
        self.check_deadline()?;

        self.commit_cache()?;

        Ok(BuildReport {
            discovery,
            compiled,
            written,
            pages,
            elapsed: deadline.elapsed(),
        })
    }

    /// Persist the cache of a completed build.
    pub fn commit_cache(&mut self) -> Result<usize> {
        self.require(Progress::Paged, "commit_cache")?;
        let cache = self
            .state
            .cache
            .as_mut()
            .ok_or(BuildError::Stage("commit_cache", "prepare"))?;
        Ok(cache.persist()?)
    }

    fn check_deadline(&self) -> Result<()> {
        match self.state.deadline {
            Some(deadline) if deadline.is_expired() => {
                Err(BuildError::DeadlineExceeded(deadline.elapsed()))
            }
            _ => Ok(()),
        }
    }

    /// Error unless the build has reached `needed`.
    fn require(&self, needed: Progress, op: &'static str) -> Result<()> {
        if self.state.progress < needed {
            return Err(BuildError::Stage(op, needed.stage()));
        }
        Ok(())
    }

    fn address_table(&self, op: &'static str) -> Result<Arc<AddressTable>> {
        self.state
            .table
            .clone()
            .ok_or(BuildError::Stage(op, Progress::Prepared.stage()))
    }
}
