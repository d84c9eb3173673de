//! Reference rewriting and page dependency extraction.
//!
//! - Module specifiers inside compiled code are rewritten to the output
//!   route of the file they name.
//! - Page shells are scanned for the scripts and stylesheets they load.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use rustc_hash::FxHashSet;

use crate::core::Route;

use super::AddressTable;

/// `import x from "…"`, `export … from "…"`, `import "…"`, `import("…")`
static IMPORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?P<pre>\bfrom\s*|\bimport\s*\(\s*|\bimport\s+)(?P<quote>["'])(?P<spec>[^"'\r\n]+)["']"#)
        .unwrap_or_else(|e| panic!("invalid import pattern: {e}"))
});

/// Opening `<script …>` / `<link …>` tags.
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(?P<tag>script|link)\b(?P<attrs>[^>]*)>")
        .unwrap_or_else(|e| panic!("invalid tag pattern: {e}"))
});

/// `name="value"` / `name='value'` attribute pairs.
static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\b(?P<name>src|href|rel)\s*=\s*["'](?P<value>[^"']*)["']"#)
        .unwrap_or_else(|e| panic!("invalid attribute pattern: {e}"))
});

/// `<link rel>` values that make the browser fetch the target as a page dependency.
const LOADED_RELS: &[&str] = &["stylesheet", "modulepreload"];

impl AddressTable {
    /// Rewrite every module specifier in `code` that names a discovered
    /// route so it points at that route's output, relative to the output of
    /// `source`. Bare and external specifiers are left untouched.
    pub fn rewrite_imports(&self, source: &Route, code: &str) -> String {
        let from_dir = self
            .output_of(source)
            .map_or_else(|| source.dir(), Route::dir);
        let source_dir = source.dir();

        IMPORT_RE
            .replace_all(code, |caps: &Captures| {
                let spec = &caps["spec"];
                match self.resolve_specifier(&source_dir, spec) {
                    Some((output, suffix)) => format!(
                        "{}{q}{}{suffix}{q}",
                        &caps["pre"],
                        output.relative_from(&from_dir),
                        q = &caps["quote"],
                    ),
                    None => caps[0].to_string(),
                }
            })
            .into_owned()
    }

    /// Ordered, de-duplicated output routes a page shell loads at runtime.
    ///
    /// References resolve against the directory of `page_output`; only
    /// known output routes are kept.
    pub fn page_dependencies(&self, shell: &str, page_output: &Route) -> Vec<Route> {
        let base = page_output.dir();
        let mut seen = FxHashSet::default();
        let mut deps = Vec::new();

        for tag in TAG_RE.captures_iter(shell) {
            let Some(reference) = loaded_reference(&tag["tag"], &tag["attrs"]) else {
                continue;
            };
            if is_external(&reference) {
                continue;
            }

            let (path, _) = split_suffix(&reference);
            let target = base.join(path);
            if self.is_output(&target) && seen.insert(target.clone()) {
                deps.push(target);
            }
        }

        deps
    }

    /// Resolve a relative or root specifier to an output route.
    ///
    /// Returns the output and the query/fragment suffix to re-attach.
    fn resolve_specifier<'s>(&self, source_dir: &Route, spec: &'s str) -> Option<(&Route, &'s str)> {
        if !(spec.starts_with("./") || spec.starts_with("../") || spec.starts_with('/')) {
            return None;
        }
        if is_external(spec) {
            return None;
        }

        let (path, suffix) = split_suffix(spec);
        let target = source_dir.join(path);
        self.output_of(&target).map(|output| (output, suffix))
    }
}

/// The URL a `<script>` or `<link>` tag makes the browser load, if any.
fn loaded_reference(tag: &str, attrs: &str) -> Option<String> {
    let mut src = None;
    let mut href = None;
    let mut rel = None;

    for attr in ATTR_RE.captures_iter(attrs) {
        let value = attr["value"].trim().to_string();
        match attr["name"].to_ascii_lowercase().as_str() {
            "src" => src = Some(value),
            "href" => href = Some(value),
            "rel" => rel = Some(value.to_ascii_lowercase()),
            _ => {}
        }
    }

    if tag.eq_ignore_ascii_case("script") {
        return src.filter(|s| !s.is_empty());
    }

    let loads = rel.is_some_and(|rel| {
        rel.split_ascii_whitespace()
            .any(|r| LOADED_RELS.contains(&r))
    });
    if loads { href.filter(|h| !h.is_empty()) } else { None }
}

/// Split `path?query#fragment` into the path and the suffix.
fn split_suffix(spec: &str) -> (&str, &str) {
    match spec.find(['?', '#']) {
        Some(idx) => spec.split_at(idx),
        None => (spec, ""),
    }
}

/// Protocol-relative, absolute or inline URLs.
fn is_external(reference: &str) -> bool {
    reference.starts_with("//") || reference.contains("://") || reference.starts_with("data:")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::AddressRequest;
    use rustc_hash::FxHashMap;

    fn table(routes: &[&str]) -> AddressTable {
        let requests: Vec<_> = routes
            .iter()
            .map(|r| AddressRequest {
                route: Route::new(r),
                reserved: None,
            })
            .collect();
        let exts: FxHashMap<String, String> = [("svelte".to_string(), "js".to_string())]
            .into_iter()
            .collect();
        AddressTable::build(&requests, &exts, FxHashSet::default())
    }

    #[test]
    fn test_rewrite_static_imports() {
        let table = table(&["/index.svelte", "/lib/button.svelte", "/lib/util.js"]);
        let code = r#"import Button from "./lib/button.svelte";
import { f } from './lib/util.js';
import "./missing.js";
import svelte from "svelte/internal";"#;

        let out = table.rewrite_imports(&Route::new("/index.svelte"), code);

        assert!(out.contains(r#"import Button from "./lib/button.js";"#));
        assert!(out.contains("import { f } from './lib/util.js';"));
        assert!(out.contains(r#"import "./missing.js";"#));
        assert!(out.contains(r#"import svelte from "svelte/internal";"#));
    }

    #[test]
    fn test_rewrite_parent_and_dynamic_imports() {
        let table = table(&["/blog/index.svelte", "/lib/button.svelte"]);
        let code = r#"const m = import("../lib/button.svelte?v=2");
export { default } from "/lib/button.svelte";"#;

        let out = table.rewrite_imports(&Route::new("/blog/index.svelte"), code);

        assert!(out.contains(r#"import("../lib/button.js?v=2")"#));
        assert!(out.contains(r#"export { default } from "../lib/button.js";"#));
    }

    #[test]
    fn test_rewrite_leaves_unknown_untouched() {
        let table = table(&["/index.svelte"]);
        let code = "import x from 'https://cdn.example.com/x.js';";
        assert_eq!(table.rewrite_imports(&Route::new("/index.svelte"), code), code);
    }

    #[test]
    fn test_page_dependencies() {
        let table = table(&["/blog/index.svelte", "/blog/app.css", "/favicon.ico", "/shared.js"]);
        let shell = r#"<!DOCTYPE html>
<html>
<head>
<link rel="icon" href="/favicon.ico">
<link rel="stylesheet" href="./app.css">
<script type="module" src="/shared.js"></script>
</head>
<body></body>
<script type="module" src="./index.js"></script>
<script type="module" src="./index.js"></script>
<script src="https://cdn.example.com/lib.js"></script>
<script src="./unknown.js"></script>
</html>"#;

        let deps = table.page_dependencies(shell, &Route::new("/blog/index.js"));
        let deps: Vec<_> = deps.iter().map(Route::as_str).collect();

        assert_eq!(deps, vec!["/blog/app.css", "/shared.js", "/blog/index.js"]);
    }

    #[test]
    fn test_split_suffix() {
        assert_eq!(split_suffix("./a.js?v=1"), ("./a.js", "?v=1"));
        assert_eq!(split_suffix("./a.js#x"), ("./a.js", "#x"));
        assert_eq!(split_suffix("./a.js"), ("./a.js", ""));
    }
}
