use super::*;

use std::fs;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tempfile::TempDir;

use crate::bundler::BundlerPlugin;
use crate::freshness::ContentHash;

// =============================================================================
// Fixtures
// =============================================================================

fn write(root: &Path, rel: &str, content: impl AsRef<[u8]>) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn project(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (rel, content) in files {
        write(dir.path(), &format!("public/{rel}"), content);
    }
    dir
}

fn dirs() -> Vec<PathBuf> {
    vec![PathBuf::from("public")]
}

/// `.page` compiles to `.js`, prefixed with the render mode; `index.page`
/// gets a shell loading its own module.
fn mediator(root: &Path, calls: &Arc<AtomicUsize>) -> Mediator {
    let mut mediator = Mediator::new(root);
    let counter = Arc::clone(calls);
    mediator.declare_transpilation("page", "js", move |file, mode| {
        counter.fetch_add(1, Ordering::SeqCst);
        let source = fs::read_to_string(&file.path)?;
        if source.contains("syntax error") {
            anyhow::bail!("cannot compile {}", file.route);
        }
        Ok(format!("// {mode}\n{source}"))
    });
    mediator.set_page_handler("page", |input: PageInput<'_>| {
        Ok(Some(format!(
            "<html><body><!-- HTML --></body><script type=\"module\" src=\"./{}\"></script></html>",
            input.route.file_name()
        )))
    });
    mediator
}

fn calls() -> Arc<AtomicUsize> {
    Arc::new(AtomicUsize::new(0))
}

/// Counts bundle invocations per entry; entries named `fail_on` fail.
#[derive(Clone, Default)]
struct CountingBundler {
    calls: Arc<Mutex<FxHashMap<PathBuf, usize>>>,
    fail_on: Option<&'static str>,
}

impl CountingBundler {
    fn failing(name: &'static str) -> Self {
        Self {
            fail_on: Some(name),
            ..Self::default()
        }
    }

    fn count(&self, suffix: &str) -> usize {
        let calls = self.calls.lock().unwrap();
        calls
            .iter()
            .filter(|(path, _)| path.ends_with(suffix))
            .map(|(_, n)| n)
            .sum()
    }
}

#[async_trait]
impl Bundler for CountingBundler {
    async fn bundle(
        &self,
        entries: &[PathBuf],
        _plugins: &[Arc<dyn BundlerPlugin>],
    ) -> anyhow::Result<Vec<String>> {
        let mut outputs = Vec::new();
        for entry in entries {
            *self.calls.lock().unwrap().entry(entry.clone()).or_default() += 1;
            if self.fail_on.is_some_and(|name| entry.ends_with(name)) {
                anyhow::bail!("unresolved import in {}", entry.display());
            }
            let code = tokio::fs::read_to_string(entry).await?;
            outputs.push(format!("/* bundled */\n{code}"));
        }
        Ok(outputs)
    }
}

fn route<'a>(table: &'a [RouteEntry], route: &str) -> Option<&'a RouteEntry> {
    table.iter().find(|entry| entry.route == route)
}

// =============================================================================
// Cache classification
// =============================================================================

#[tokio::test]
async fn test_first_build_inserts_every_file() {
    let dir = project(&[("a.page", "a"), ("b.txt", "b"), ("c/d.css", "c")]);
    let mut mediator = mediator(dir.path(), &calls());

    let report = mediator.prepare(&dirs()).unwrap();
    assert_eq!(report.inserted, 3);
    assert_eq!(report.cached + report.updated, 0);

    mediator.transpile().unwrap();

    let cache = mediator.cache().unwrap();
    let table = mediator.table().unwrap();
    assert_eq!(cache.len(), 3);
    for (rel, content) in [("/a.page", "a"), ("/b.txt", "b"), ("/c/d.css", "c")] {
        let route = Route::new(rel);
        let entry = cache.get(&route).unwrap();
        assert_eq!(entry.hash, ContentHash::of(content.as_bytes()));
        assert_eq!(Some(&entry.path), table.output_of(&route));
    }
    assert_eq!(cache.get(&Route::new("/a.page")).unwrap().path, "/a.js");
}

#[tokio::test]
async fn test_unchanged_files_skip_transpiler() {
    let dir = project(&[("index.page", "hello"), ("style.css", "a {}")]);
    let calls = calls();

    let mut first = mediator(dir.path(), &calls);
    first.build(&dirs()).await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    let first_output = first.table().unwrap().output_of(&Route::new("/index.page")).cloned();

    let mut second = mediator(dir.path(), &calls);
    let report = second.build(&dirs()).await.unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(report.discovery.cached, 2);
    assert_eq!(report.compiled, 0);
    assert_eq!(
        second.table().unwrap().output_of(&Route::new("/index.page")).cloned(),
        first_output
    );

    let routes = second.route_table();
    let reused = route(&routes, "/index.js").unwrap();
    assert_eq!(reused.original.as_ref().unwrap(), "/index.page");
    assert!(reused.content.resolve("/index.js").contains("hello"));
}

#[tokio::test]
async fn test_changed_content_updates_hash_and_keeps_path() {
    let dir = project(&[("index.page", "v1")]);
    let calls = calls();
    mediator(dir.path(), &calls).build(&dirs()).await.unwrap();

    write(dir.path(), "public/index.page", "v2");
    let mut second = mediator(dir.path(), &calls);
    let report = second.build(&dirs()).await.unwrap();

    assert_eq!(report.discovery.updated, 1);
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    let cache = ContentCache::open(second.build_dir()).unwrap();
    let entry = cache.get(&Route::new("/index.page")).unwrap();
    assert_eq!(entry.hash, ContentHash::of(b"v2"));
    assert_eq!(entry.path, "/index.js");

    let written = fs::read_to_string(second.output_dir().join("index.js")).unwrap();
    assert!(written.ends_with("v2"));
}

#[tokio::test]
async fn test_missing_output_is_rebuilt_in_place() {
    let dir = project(&[("main.page", "x")]);
    let calls = calls();
    let mut first = mediator(dir.path(), &calls);
    first.build(&dirs()).await.unwrap();

    fs::remove_file(first.output_dir().join("main.js")).unwrap();

    let mut second = mediator(dir.path(), &calls);
    let report = second.build(&dirs()).await.unwrap();

    assert_eq!(report.discovery.updated, 1);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert!(second.output_dir().join("main.js").is_file());
}

#[tokio::test]
async fn test_removed_files_are_pruned() {
    let dir = project(&[("a.txt", "a"), ("b.txt", "b")]);
    mediator(dir.path(), &calls()).build(&dirs()).await.unwrap();

    fs::remove_file(dir.path().join("public/b.txt")).unwrap();
    let mut second = mediator(dir.path(), &calls());
    let report = second.build(&dirs()).await.unwrap();

    assert_eq!(report.discovery.pruned, 1);
    let cache = ContentCache::open(second.build_dir()).unwrap();
    assert_eq!(cache.len(), 1);
    assert!(cache.get(&Route::new("/b.txt")).is_none());
}

#[tokio::test]
async fn test_prune_disabled_keeps_rows() {
    let dir = project(&[("a.txt", "a"), ("b.txt", "b")]);
    mediator(dir.path(), &calls()).build(&dirs()).await.unwrap();

    fs::remove_file(dir.path().join("public/b.txt")).unwrap();
    let mut second = mediator(dir.path(), &calls()).with_prune(false);
    second.build(&dirs()).await.unwrap();

    assert_eq!(ContentCache::open(second.build_dir()).unwrap().len(), 2);
}

// =============================================================================
// Transpilation
// =============================================================================

#[tokio::test]
async fn test_ssr_compiles_twice_into_disjoint_roots() {
    let dir = project(&[("index.page", "app")]);
    let calls = calls();
    let mut mediator = mediator(dir.path(), &calls).with_ssr(true);
    mediator.build(&dirs()).await.unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 2);

    let client = fs::read_to_string(mediator.output_dir().join("index.js")).unwrap();
    let server = fs::read_to_string(mediator.ssr_output_dir().join("index.js")).unwrap();
    assert!(client.contains("// client"));
    assert!(server.starts_with("// server"));
    assert_eq!(mediator.server_transpiled().count(), 1);
}

#[tokio::test]
async fn test_dot_entries_are_built() {
    let dir = project(&[
        (".well-known/security.txt", "Contact: mailto:security@example.com"),
        (".htaccess", "Options -Indexes"),
        ("a.txt", "a"),
    ]);
    let mut mediator = mediator(dir.path(), &calls());
    let report = mediator.build(&dirs()).await.unwrap();

    assert_eq!(report.discovery.inserted, 3);
    assert!(mediator.output_dir().join(".well-known/security.txt").is_file());
    let routes = mediator.route_table();
    assert!(route(&routes, "/.htaccess").is_some());
    assert!(route(&routes, "/.well-known/security.txt").is_some());
}

#[test]
fn test_passes_are_swept_in_order_every_build() {
    let dir = project(&[("a.page", "a")]);
    let modes = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&modes);

    let mut mediator = Mediator::new(dir.path()).with_ssr(true);
    mediator.declare_transpilation("page", "js", move |_, mode| {
        seen.lock().unwrap().push(mode);
        Ok(String::new())
    });

    for _ in 0..2 {
        mediator.prepare(&dirs()).unwrap();
        mediator.transpile().unwrap();
    }

    assert_eq!(
        *modes.lock().unwrap(),
        vec![
            RenderMode::Client,
            RenderMode::Server,
            RenderMode::Client,
            RenderMode::Server
        ]
    );
}

#[test]
fn test_static_build_compiles_once() {
    let dir = project(&[("a.page", "a"), ("b.page", "b")]);
    let calls = calls();
    let mut mediator = mediator(dir.path(), &calls);

    mediator.prepare(&dirs()).unwrap();
    assert_eq!(mediator.transpile().unwrap(), 2);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(mediator.server_transpiled().count(), 0);
}

#[test]
fn test_imports_point_at_outputs() {
    let dir = project(&[
        ("index.page", "import Button from './lib/button.page';"),
        ("lib/button.page", "export default 1;"),
    ]);
    let mut mediator = mediator(dir.path(), &calls());
    mediator.prepare(&dirs()).unwrap();
    mediator.transpile().unwrap();

    let unit = mediator
        .transpiled()
        .iter()
        .find(|unit| unit.original == "/index.page")
        .unwrap();
    assert!(unit.text().contains("from './lib/button.js'"));
}

#[test]
fn test_binary_files_round_trip() {
    let dir = TempDir::new().unwrap();
    let png = [0x89u8, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0xff, 0x00];
    write(dir.path(), "public/logo.png", png);
    write(dir.path(), "public/index.page", "page");

    let mut mediator = mediator(dir.path(), &calls());
    mediator.prepare(&dirs()).unwrap();
    mediator.transpile().unwrap();
    mediator.to_fs().unwrap();

    for unit in mediator.transpiled() {
        let on_disk = fs::read(mediator.output_dir().join(unit.path.to_fs_relative())).unwrap();
        assert_eq!(on_disk, unit.content);
    }
    assert_eq!(fs::read(mediator.output_dir().join("logo.png")).unwrap(), png);
}

#[tokio::test]
async fn test_compile_error_aborts_and_keeps_cache() {
    let dir = project(&[("index.page", "v1")]);
    mediator(dir.path(), &calls()).build(&dirs()).await.unwrap();

    write(dir.path(), "public/index.page", "syntax error");
    let mut second = mediator(dir.path(), &calls());
    let err = second.build(&dirs()).await.unwrap_err();

    assert!(matches!(err, BuildError::Compile { mode: RenderMode::Client, .. }));
    let cache = ContentCache::open(second.build_dir()).unwrap();
    assert_eq!(
        cache.get(&Route::new("/index.page")).unwrap().hash,
        ContentHash::of(b"v1")
    );
}

#[test]
fn test_stages_must_run_in_order() {
    let dir = project(&[("a.txt", "a")]);
    let mut mediator = Mediator::new(dir.path());

    assert!(matches!(
        mediator.transpile(),
        Err(BuildError::Stage("transpile", "prepare"))
    ));
    mediator.prepare(&dirs()).unwrap();
    assert!(matches!(
        mediator.to_fs(),
        Err(BuildError::Stage("to_fs", "transpile"))
    ));
}

#[test]
fn test_missing_source_dir_is_fatal() {
    let dir = TempDir::new().unwrap();
    let mut mediator = Mediator::new(dir.path());
    assert!(matches!(
        mediator.prepare(&dirs()),
        Err(BuildError::Discovery(..))
    ));
}

#[tokio::test]
async fn test_deadline_aborts_without_persisting() {
    let dir = project(&[("a.txt", "a")]);
    let mut mediator = Mediator::new(dir.path()).with_timeout(Some(Duration::ZERO));

    let err = mediator.build(&dirs()).await.unwrap_err();
    assert!(matches!(err, BuildError::DeadlineExceeded(_)));
    assert!(!mediator.build_dir().join("cache/index.json").exists());
}

// =============================================================================
// Pages and bundling
// =============================================================================

#[tokio::test]
async fn test_shell_only_for_non_script_index() {
    let dir = project(&[("index.page", "page"), ("index.js", "script")]);
    let shells = Arc::new(Mutex::new(Vec::new()));

    let mut mediator = mediator(dir.path(), &calls());
    for ext in ["page", "js"] {
        let shells = Arc::clone(&shells);
        mediator.set_page_handler(ext, move |input: PageInput<'_>| {
            shells.lock().unwrap().push(input.route.clone());
            Ok(Some("<html></html>".to_string()))
        });
    }
    let report = mediator.build(&dirs()).await.unwrap();

    let shells = shells.lock().unwrap();
    assert_eq!(shells.len(), 1);
    assert_eq!(
        mediator.table().unwrap().original_of(&shells[0]).unwrap(),
        "/index.page"
    );
    assert_eq!(report.pages.generated, 1);
}

#[tokio::test]
async fn test_index_without_handler_is_skipped() {
    let dir = project(&[("index.md", "# hi")]);
    let mut mediator = Mediator::new(dir.path());
    let report = mediator.build(&dirs()).await.unwrap();

    assert_eq!(report.pages.generated, 0);
    assert!(!mediator.output_dir().join(PAGE_DOCUMENT).exists());
}

#[tokio::test]
async fn test_shared_dependency_bundled_once() {
    let dir = project(&[
        ("a/index.page", "a"),
        ("b/index.page", "b"),
        ("shared.js", "export const shared = 1;"),
    ]);
    let bundler = CountingBundler::default();
    let mut mediator = mediator(dir.path(), &calls()).with_bundler(bundler.clone());
    mediator.set_page_handler("page", |input: PageInput<'_>| {
        Ok(Some(format!(
            "<script src=\"/shared.js\"></script><script src=\"./{}\"></script>",
            input.route.file_name()
        )))
    });

    let report = mediator.build(&dirs()).await.unwrap();

    assert_eq!(bundler.count("shared.js"), 1);
    assert_eq!(bundler.count("a/index.js"), 1);
    assert_eq!(bundler.count("b/index.js"), 1);
    assert_eq!(report.pages.generated, 2);
    assert_eq!(report.pages.bundled, 3);

    let shared = fs::read_to_string(mediator.output_dir().join("shared.js")).unwrap();
    assert!(shared.starts_with("/* bundled */"));
    let unit = mediator
        .transpiled()
        .iter()
        .find(|unit| unit.path == "/shared.js")
        .unwrap();
    assert_eq!(unit.text(), shared);
}

#[tokio::test]
async fn test_bundle_failure_drops_only_that_page() {
    let dir = project(&[
        ("a/index.page", "a"),
        ("a/broken.js", "import nope from 'nope';"),
        ("b/index.page", "b"),
    ]);
    let mut mediator = mediator(dir.path(), &calls()).with_bundler(CountingBundler::failing("broken.js"));
    mediator.set_page_handler("page", |input: PageInput<'_>| {
        let dir = input.route.dir();
        let extra = if dir == "/a" { "<script src=\"./broken.js\"></script>" } else { "" };
        Ok(Some(format!("{extra}<script src=\"./{}\"></script>", input.route.file_name())))
    });

    let report = mediator.build(&dirs()).await.unwrap();

    assert_eq!(report.pages.failed, 1);
    assert_eq!(report.pages.generated, 1);
    assert!(!mediator.output_dir().join("a").join(PAGE_DOCUMENT).exists());
    assert!(mediator.output_dir().join("b").join(PAGE_DOCUMENT).is_file());

    let routes = mediator.route_table();
    assert!(route(&routes, "/a").is_none());
    assert!(route(&routes, "/b").unwrap().path.is_some());
}

fn dep_shell(input: PageInput<'_>) -> anyhow::Result<Option<String>> {
    Ok(Some(format!(
        "<script src=\"./dep.js\"></script><script src=\"./{}\"></script>",
        input.route.file_name()
    )))
}

#[tokio::test]
async fn test_failed_dependency_rebundled_next_build() {
    let dir = project(&[("a/index.page", "a"), ("a/dep.js", "export const x = 1;")]);

    let mut first = mediator(dir.path(), &calls()).with_bundler(CountingBundler::failing("dep.js"));
    first.set_page_handler("page", dep_shell);
    let report = first.build(&dirs()).await.unwrap();
    assert_eq!(report.pages.failed, 1);

    let bundler = CountingBundler::default();
    let mut second = mediator(dir.path(), &calls()).with_bundler(bundler.clone());
    second.set_page_handler("page", dep_shell);
    let report = second.build(&dirs()).await.unwrap();

    assert_eq!(report.discovery.updated, 2);
    assert_eq!(bundler.count("dep.js"), 1);
    assert_eq!(report.pages.generated, 1);
    let dep = fs::read_to_string(second.output_dir().join("a/dep.js")).unwrap();
    assert!(dep.starts_with("/* bundled */"));
    assert!(second.output_dir().join("a").join(PAGE_DOCUMENT).is_file());

    let bundler = CountingBundler::default();
    let mut third = mediator(dir.path(), &calls()).with_bundler(bundler.clone());
    third.set_page_handler("page", dep_shell);
    let report = third.build(&dirs()).await.unwrap();

    assert_eq!(report.discovery.cached, 2);
    assert_eq!(bundler.count("dep.js"), 0);
}

#[tokio::test]
async fn test_html_source_is_its_own_document() {
    let dir = project(&[("index.html", "<html>home</html>"), ("about/index.html", "<html>about</html>")]);
    let mut mediator = Mediator::new(dir.path());
    mediator.set_page_handler("html", |input: PageInput<'_>| {
        let shell = fs::read_to_string(input.output)?;
        if input.route.dir() == "/about" {
            return Ok(Some(shell.replace("about", "about us")));
        }
        Ok(Some(shell))
    });
    let report = mediator.build(&dirs()).await.unwrap();

    assert_eq!(report.pages.generated, 2);
    let output = mediator.output_dir();
    assert_eq!(fs::read_to_string(output.join(PAGE_DOCUMENT)).unwrap(), "<html>home</html>");
    assert_eq!(
        fs::read_to_string(output.join("about").join(PAGE_DOCUMENT)).unwrap(),
        "<html>about us</html>"
    );
}

#[tokio::test]
async fn test_static_pages_listed_and_reused() {
    let dir = project(&[("index.page", "home"), ("blog/index.page", "blog")]);
    let bundler = CountingBundler::default();

    let mut first = mediator(dir.path(), &calls()).with_bundler(bundler.clone());
    first.build(&dirs()).await.unwrap();
    let routes = first.route_table();
    let home = route(&routes, "/").unwrap();
    assert_eq!(home.path.as_deref(), Some(first.output_dir().join(PAGE_DOCUMENT).as_path()));
    assert!(route(&routes, "/blog").is_some());
    assert_eq!(bundler.count("index.js"), 2);

    let mut second = mediator(dir.path(), &calls()).with_bundler(bundler.clone());
    let report = second.build(&dirs()).await.unwrap();
    assert_eq!(report.pages.reused, 2);
    assert_eq!(report.pages.generated, 0);
    assert_eq!(bundler.count("index.js"), 2);

    let routes = second.route_table();
    assert!(route(&routes, "/").is_some());
    assert!(route(&routes, "/blog").is_some());
}

#[tokio::test]
async fn test_ssr_render_memoized_per_route() {
    let dir = project(&[("blog/index.page", "blog")]);
    let renders = calls();
    let counter = Arc::clone(&renders);

    let mut mediator = mediator(dir.path(), &calls()).with_ssr(true);
    mediator.set_ssr_page_handler("page", move |input: SsrInput<'_>| {
        counter.fetch_add(1, Ordering::SeqCst);
        assert_eq!(input.dir_route, "/blog");
        assert!(input.ssr_output.ends_with("output-ssr/blog/index.js"));
        Ok(Some(input.shell.replace("<!-- HTML -->", &format!("<h1>{}</h1>", input.route))))
    });
    mediator.build(&dirs()).await.unwrap();

    let routes = mediator.route_table();
    let blog = route(&routes, "/blog").unwrap();
    assert!(blog.content.is_render());

    let first = blog.content.resolve("/blog/post-1");
    let second = blog.content.resolve("/blog/post-1");
    assert!(first.contains("<h1>/blog/post-1</h1>"));
    assert_eq!(first, second);
    assert_eq!(renders.load(Ordering::SeqCst), 1);

    blog.content.resolve("/blog/post-2");
    assert_eq!(renders.load(Ordering::SeqCst), 2);
    assert_eq!(mediator.ssr_cache().len(), 2);
}

#[tokio::test]
async fn test_cached_ssr_page_uses_previous_shell() {
    let dir = project(&[("blog/index.page", "blog")]);
    mediator(dir.path(), &calls()).with_ssr(true).build(&dirs()).await.unwrap();

    let mut second = mediator(dir.path(), &calls()).with_ssr(true);
    second.set_ssr_page_handler("page", |input: SsrInput<'_>| {
        Ok(Some(input.shell.replace("<!-- HTML -->", "<p>cached</p>")))
    });
    let report = second.build(&dirs()).await.unwrap();
    assert_eq!(report.pages.reused, 1);

    let routes = second.route_table();
    let markup = route(&routes, "/blog").unwrap().content.resolve("/blog");
    assert!(markup.contains("<p>cached</p>"));
    assert!(markup.contains("src=\"./index.js\""));
}

#[tokio::test]
async fn test_ssr_provider_without_markup_is_empty() {
    let dir = project(&[("index.page", "home")]);
    let mut mediator = mediator(dir.path(), &calls()).with_ssr(true);
    mediator.set_ssr_page_handler("page", |_: SsrInput<'_>| Ok(None));
    mediator.build(&dirs()).await.unwrap();

    let routes = mediator.route_table();
    assert_eq!(route(&routes, "/").unwrap().content.resolve("/"), "");
    assert!(mediator.ssr_cache().is_empty());
}

// =============================================================================
// Declarations
// =============================================================================

#[tokio::test]
async fn test_type_gen_writes_declarations() {
    let dir = project(&[("index.page", "home"), ("util.js", "export {}")]);
    let mut mediator = mediator(dir.path(), &calls());
    mediator.set_type_gen("page", "const page: any;\nexport default page;");
    mediator.set_type_gen("js", "const never: never;");
    mediator.set_type_imports("page", vec![TsReference::Types("kiln-page".into())]);
    mediator.build(&dirs()).await.unwrap();

    let build_dir = mediator.build_dir();
    let pages = fs::read_to_string(build_dir.join("types/pages.d.ts")).unwrap();
    assert!(pages.contains("/// <reference types=\"kiln-page\" />"));
    assert!(pages.contains("declare module \"/index.page\" {"));
    assert!(!pages.contains("/util.js"));

    let root = fs::read_to_string(build_dir.join("kiln.d.ts")).unwrap();
    assert!(root.contains("/// <reference path=\"types/pages.d.ts\" />"));
    assert!(root.contains("const __KILN_SSR: boolean;"));

    let tsconfig: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(build_dir.join("tsconfig.json")).unwrap()).unwrap();
    let include = tsconfig["include"].as_array().unwrap();
    assert!(include.iter().any(|v| v == "../public/**/*"));
}
