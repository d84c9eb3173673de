//! Declaration generator: aggregate `.d.ts` files and a tsconfig.

mod tree;

pub use tree::{TsDeclaration, TsModule, TsReference, TsTree};

use rustc_hash::FxHashMap;
use serde_json::json;

/// Main declaration file, relative to the build directory.
pub const ROOT_DECLARATION: &str = "kiln.d.ts";
/// Per-page module declarations, relative to the build directory.
pub const PAGES_DECLARATION: &str = "types/pages.d.ts";
pub const TSCONFIG: &str = "tsconfig.json";

/// Accumulates declaration trees by output file.
#[derive(Debug, Default, Clone)]
pub struct TsGenerator {
    declarations: FxHashMap<String, TsTree>,
}

impl TsGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the tree for a declaration file, replacing any previous one.
    pub fn declare(&mut self, path: impl Into<String>, tree: TsTree) {
        self.declarations.insert(path.into(), tree);
    }

    pub fn tree(&self, path: &str) -> Option<&TsTree> {
        self.declarations.get(path)
    }

    /// Render one declaration file.
    pub fn render(&self, path: &str) -> Option<String> {
        self.declarations.get(path).map(TsTree::render)
    }

    /// Declaration files in a stable order.
    pub fn paths(&self) -> Vec<&str> {
        let mut paths: Vec<_> = self.declarations.keys().map(String::as_str).collect();
        paths.sort_unstable();
        paths
    }

    /// Type-checker configuration including every declared file and the
    /// given source globs (relative to the build directory).
    pub fn tsconfig(&self, sources: &[String]) -> String {
        let mut include: Vec<String> = self.paths().into_iter().map(String::from).collect();
        include.extend(sources.iter().cloned());

        let config = json!({
            "compilerOptions": {
                "target": "ESNext",
                "module": "ESNext",
                "moduleResolution": "bundler",
                "lib": ["ESNext", "DOM"],
                "strict": true,
                "allowJs": true,
                "checkJs": false,
                "noEmit": true,
                "skipLibCheck": true,
            },
            "include": include,
        });

        // A `Value` built from literals always serializes.
        serde_json::to_string_pretty(&config).unwrap_or_default()
    }
}
