//! Page generation and dependency bundling.
//!
//! Pages are finalized one at a time. For each page, every dependency not
//! yet bundled this build is bundled concurrently; the page's document is
//! written only after all of them settled. Dependencies are bundled at most
//! once per build, so no two bundle tasks ever target the same file.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};
use tokio::task::{JoinError, JoinSet};

use crate::bundler::{Bundler, BundlerPlugin};
use crate::core::Route;
use crate::error::{BuildError, Result};
use crate::page::{GeneratedPage, PageInput, SsrTarget, render_provider};

use super::{Mediator, PAGE_DOCUMENT, Progress};

/// Counts from [`Mediator::page_gen`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageReport {
    /// Pages whose document was written this build
    pub generated: usize,
    /// Unchanged pages carried over from the previous build
    pub reused: usize,
    /// Pages dropped because a dependency failed to bundle
    pub failed: usize,
    /// Dependencies bundled this build
    pub bundled: usize,
}

/// A bundled dependency and its output.
type Bundled = (Route, anyhow::Result<String>);
type Joined = std::result::Result<Bundled, JoinError>;

/// A page waiting for its dependencies.
struct Staged {
    page: GeneratedPage,
    /// Server-render provider arguments, when SSR is on
    ssr: Option<SsrTarget>,
}

impl Mediator {
    /// Build page shells, bundle their dependencies and register page routes.
    pub async fn page_gen(&mut self) -> Result<PageReport> {
        self.require(Progress::Emitted, "page_gen")?;

        let mut report = PageReport::default();
        let staged = self.stage_pages();
        self.reuse_pages(&mut report);
        self.finalize_pages(staged, &mut report).await?;

        crate::log!(
            "page";
            "{} generated, {} reused, {} bundled{}",
            report.generated,
            report.reused,
            report.bundled,
            if report.failed > 0 { format!(", {} failed", report.failed) } else { String::new() }
        );

        self.state.progress = Progress::Paged;
        Ok(report)
    }

    /// Build a shell for every freshly compiled page source.
    fn stage_pages(&self) -> Vec<Staged> {
        let Some(table) = self.state.table.as_deref() else {
            return Vec::new();
        };
        let output_dir = self.output_dir();
        let mut staged = Vec::new();

        for unit in &self.state.client {
            let Some(original) = table.original_of(&unit.path) else {
                continue;
            };
            let Some(ext) = self.page_extension(original) else {
                if original.stem() == "index" {
                    crate::debug!("page"; "no page handler for {}", original);
                }
                continue;
            };

            let output = output_dir.join(unit.path.to_fs_relative());
            let input = PageInput {
                route: &unit.path,
                output: &output,
            };
            let code = match self.pages.build_shell(ext, input) {
                Ok(Some(code)) => code,
                Ok(None) => continue,
                Err(e) => {
                    crate::log!("error"; "page shell for {} failed: {:#}", original, e);
                    continue;
                }
            };

            let deps = table.page_dependencies(&code, &unit.path);
            let ssr = self.context.ssr.then(|| SsrTarget {
                extension: ext.to_string(),
                dir_route: unit.path.dir(),
                shell: code.clone(),
                ssr_output: self.ssr_output_dir().join(unit.path.to_fs_relative()),
            });

            staged.push(Staged {
                page: GeneratedPage {
                    code,
                    deps,
                    route: unit.path.clone(),
                },
                ssr,
            });
        }

        staged
    }

    /// Re-register unchanged pages without rebuilding or re-bundling them.
    fn reuse_pages(&mut self, report: &mut PageReport) {
        let output_dir = self.output_dir();
        let mut providers = Vec::new();

        for reused in &self.state.reused {
            let Some(ext) = self.page_extension(&reused.file.route) else {
                continue;
            };
            let dir = reused.unit.path.dir();

            if self.context.ssr {
                let document = output_dir.join(dir.to_fs_relative()).join(PAGE_DOCUMENT);
                let shell = match fs::read_to_string(&document) {
                    Ok(shell) => shell,
                    Err(e) => {
                        crate::log!("error"; "cannot reuse {}: {}", document.display(), e);
                        continue;
                    }
                };
                let target = SsrTarget {
                    extension: ext.to_string(),
                    dir_route: dir.clone(),
                    shell,
                    ssr_output: self.ssr_output_dir().join(reused.unit.path.to_fs_relative()),
                };
                providers.push((dir, target));
            } else {
                self.state.pages.insert(dir);
            }
            report.reused += 1;
        }

        for (dir, target) in providers {
            self.register_provider(dir, target);
        }
    }

    /// Bundle dependencies page by page and write each page's document.
    async fn finalize_pages(&mut self, staged: Vec<Staged>, report: &mut PageReport) -> Result<()> {
        let output_dir = self.output_dir();
        let plugins: Arc<[Arc<dyn BundlerPlugin>]> = self.plugins.bundler_plugins().into();

        // Only outputs written this build are bundled; reused ones already were.
        let fresh: FxHashMap<Route, usize> = self
            .state
            .client
            .iter()
            .enumerate()
            .map(|(idx, unit)| (unit.path.clone(), idx))
            .collect();
        let mut settled: FxHashMap<Route, bool> = FxHashMap::default();

        for Staged { page, ssr } in staged {
            self.check_deadline()?;

            let mut tasks = JoinSet::new();
            let mut queued = FxHashSet::default();

            for dep in &page.deps {
                if !fresh.contains_key(dep) || settled.contains_key(dep) || !queued.insert(dep.clone()) {
                    continue;
                }
                let bundler = Arc::clone(&self.bundler);
                let plugins = Arc::clone(&plugins);
                let entry = output_dir.join(dep.to_fs_relative());
                let dep = dep.clone();
                tasks.spawn(async move { (dep, bundle_one(bundler, plugins, entry).await) });
            }

            while let Some(joined) = self.join_next(&mut tasks).await? {
                let (dep, outcome) = match joined {
                    Ok(done) => done,
                    Err(e) => {
                        crate::log!("error"; "bundle task failed: {}", e);
                        continue;
                    }
                };

                match outcome {
                    Ok(code) => {
                        if let Some(&idx) = fresh.get(&dep) {
                            self.state.client[idx].content = code.into_bytes();
                        }
                        report.bundled += 1;
                        settled.insert(dep, true);
                    }
                    Err(e) => {
                        crate::log!("error"; "bundling {} failed: {:#}", dep, e);
                        self.invalidate_output(&dep);
                        settled.insert(dep, false);
                    }
                }
            }

            // A task that panicked never reported back.
            for dep in queued {
                if !settled.contains_key(&dep) {
                    self.invalidate_output(&dep);
                    settled.insert(dep, false);
                }
            }

            let failed = page.deps.iter().find(|dep| settled.get(*dep) == Some(&false));
            if let Some(dep) = failed {
                crate::log!("error"; "page {} skipped: dependency {} did not bundle", page.dir(), dep);
                report.failed += 1;
                continue;
            }

            let dir = page.dir();
            let document = output_dir.join(dir.to_fs_relative()).join(PAGE_DOCUMENT);
            // An `index.html` source compiles straight to its own document.
            let unchanged = page.route.file_name() == PAGE_DOCUMENT
                && fs::read(&document).is_ok_and(|current| current == page.code.as_bytes());
            if !unchanged {
                fs::write(&document, &page.code).map_err(|e| BuildError::Emit(document, e))?;
            }
            report.generated += 1;

            match ssr {
                Some(target) => self.register_provider(dir, target),
                None => {
                    self.state.pages.insert(dir);
                }
            }
        }

        Ok(())
    }

    /// Next finished bundle task, bounded by the build deadline.
    async fn join_next(&self, tasks: &mut JoinSet<Bundled>) -> Result<Option<Joined>> {
        let remaining = self.state.deadline.and_then(|d| d.remaining());
        match remaining {
            Some(limit) => tokio::time::timeout(limit, tasks.join_next())
                .await
                .map_err(|_| BuildError::DeadlineExceeded(self.elapsed())),
            None => Ok(tasks.join_next().await),
        }
    }

    /// Mark the source behind an unbundled output stale, so the next build
    /// recompiles and bundles it again instead of reusing it.
    fn invalidate_output(&mut self, output: &Route) {
        let Some(table) = self.state.table.clone() else {
            return;
        };
        if let (Some(original), Some(cache)) = (table.original_of(output), self.state.cache.as_mut()) {
            cache.invalidate(original);
        }
    }

    fn register_provider(&mut self, dir: Route, target: SsrTarget) {
        let renderer = self.pages.renderer(&target.extension);
        let provider = render_provider(renderer, target, self.ssr_cache.clone());
        self.state.renderers.insert(dir, provider);
    }

    fn elapsed(&self) -> std::time::Duration {
        self.state
            .deadline
            .map(|d| d.elapsed())
            .unwrap_or_default()
    }
}

/// Bundle one dependency and write the result over its output file.
async fn bundle_one(
    bundler: Arc<dyn Bundler>,
    plugins: Arc<[Arc<dyn BundlerPlugin>]>,
    entry: PathBuf,
) -> anyhow::Result<String> {
    let mut outputs = bundler.bundle(std::slice::from_ref(&entry), &plugins).await?;
    let code = outputs
        .pop()
        .ok_or_else(|| anyhow::anyhow!("bundler produced no output for {}", entry.display()))?;
    tokio::fs::write(&entry, &code).await?;
    Ok(code)
}
