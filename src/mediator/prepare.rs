//! Discovery and cache classification.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rustc_hash::FxHashSet;

use crate::address::{AddressRequest, AddressTable};
use crate::cache::{ContentCache, Freshness};
use crate::compiler::TranspiledUnit;
use crate::core::{Route, is_script_extension};
use crate::error::{BuildError, Result};
use crate::freshness::ContentHash;
use crate::scan::{self, SourceFile};

use super::{BuildState, Mediator, PAGE_DOCUMENT, Pending, Progress, Reused};

/// Counts from [`Mediator::prepare`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiscoveryReport {
    pub cached: usize,
    pub updated: usize,
    pub inserted: usize,
    /// Cache rows dropped for routes no longer discovered
    pub pruned: usize,
}

impl DiscoveryReport {
    pub fn total(&self) -> usize {
        self.cached + self.updated + self.inserted
    }
}

impl Mediator {
    /// Discover files under `dirs`, classify them against the cache and
    /// assign output routes.
    ///
    /// Resets all per-build state. Nothing is persisted here.
    pub fn prepare(&mut self, dirs: &[PathBuf]) -> Result<DiscoveryReport> {
        self.state = BuildState {
            dirs: dirs.to_vec(),
            ..BuildState::default()
        };
        self.ssr_cache.clear();

        let output_dir = self.output_dir();
        create_dir(&output_dir)?;
        if self.context.ssr {
            create_dir(&self.ssr_output_dir())?;
        }

        let mut cache = ContentCache::open(&self.build_dir)?;
        let files = scan::discover(&self.root, dirs)?;

        let mut report = DiscoveryReport::default();
        let mut classified = Vec::with_capacity(files.len());
        let mut observed = FxHashSet::default();

        for file in files {
            let content = fs::read(&file.path).map_err(|e| BuildError::Discovery(file.path.clone(), e))?;
            let freshness = match cache.classify(&file.route, &content) {
                Freshness::Unchanged { output } => self.reconcile(&file, output, &content)?,
                other => other,
            };

            match &freshness {
                Freshness::Unchanged { .. } => report.cached += 1,
                Freshness::Update { .. } => report.updated += 1,
                Freshness::Insert { .. } => report.inserted += 1,
            }
            observed.insert(file.route.clone());
            classified.push((file, freshness));
        }

        if self.prune {
            report.pruned = cache.sweep(&observed);
        }

        let requests: Vec<_> = classified
            .iter()
            .map(|(file, freshness)| AddressRequest {
                route: file.route.clone(),
                reserved: freshness.reserved_output().cloned(),
            })
            .collect();
        let declared = self.types.by_extension.keys().cloned().collect();
        let table = AddressTable::build(&requests, &self.transpilers.output_extensions(), declared);

        for (file, freshness) in classified {
            match freshness {
                Freshness::Unchanged { .. } => {
                    let path = table.output_or_self(&file.route);
                    let disk = output_dir.join(path.to_fs_relative());
                    let content = fs::read(&disk).map_err(|e| BuildError::Discovery(disk, e))?;
                    let unit = TranspiledUnit {
                        path,
                        content,
                        original: file.route.clone(),
                    };
                    self.state.reused.push(Reused { file, unit });
                }
                freshness => self.state.work.push(Pending { file, freshness }),
            }
        }

        crate::log!(
            "build";
            "discovered {} files: {} cached, {} updated, {} new",
            report.total(), report.cached, report.updated, report.inserted
        );
        if report.pruned > 0 {
            crate::debug!("cache"; "pruned {} stale entries", report.pruned);
        }

        self.state.cache = Some(cache);
        self.state.table = Some(Arc::new(table));
        self.state.progress = Progress::Prepared;
        Ok(report)
    }

    /// Keep an unchanged classification only if everything the previous
    /// build produced for the file is still on disk; otherwise rebuild it
    /// in place.
    fn reconcile(&self, file: &SourceFile, output: Route, content: &[u8]) -> Result<Freshness> {
        let mut expected = vec![self.output_dir().join(output.to_fs_relative())];
        if self.context.ssr {
            expected.push(self.ssr_output_dir().join(output.to_fs_relative()));
        }
        if self.page_extension(&file.route).is_some() {
            expected.push(
                self.output_dir()
                    .join(output.dir().to_fs_relative())
                    .join(PAGE_DOCUMENT),
            );
        }

        if expected.iter().all(|path| path.is_file()) {
            return Ok(Freshness::Unchanged { output });
        }

        crate::debug!("cache"; "output of {} missing, rebuilding", file.route);
        Ok(Freshness::Update {
            prior: output,
            hash: ContentHash::of(content),
        })
    }

    /// Extension of a page source: named `index`, not a raw script, and
    /// with a registered shell builder.
    pub(super) fn page_extension<'r>(&self, route: &'r Route) -> Option<&'r str> {
        let ext = route.extension()?;
        let eligible = route.stem() == "index" && !is_script_extension(ext) && self.pages.has_shell(ext);
        eligible.then_some(ext)
    }
}

fn create_dir(path: &Path) -> Result<()> {
    match fs::create_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(()),
        Err(e) => Err(BuildError::Emit(path.to_path_buf(), e)),
    }
}
