//! Project building.
//!
//! Build pipeline phases:
//! - **Init** - optional clean of the build directory
//! - **Setup** - mediator from config and the default page handler
//! - **Build** - prepare -> transpile -> to_fs -> page_gen -> type_gen -> commit
//! - **Finalize** - summary line

use std::fs;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};

use crate::config::KilnConfig;
use crate::logger::BuildStatus;
use crate::mediator::{BuildReport, Mediator};
use crate::page::PageInput;

/// Build the project described by `config`.
///
/// Returns the mediator so callers can inspect the route table.
pub async fn build_project(config: &KilnConfig) -> Result<Mediator> {
    if config.build.clean {
        clean_build_dir(&config.build_dir())?;
    }

    let started = Instant::now();
    let mut mediator = Mediator::from_config(config);
    install_defaults(&mut mediator);

    match mediator.build(config.source_dirs()).await {
        Ok(report) => {
            BuildStatus::new(report.elapsed).success(&summary(&report));
            Ok(mediator)
        }
        Err(err) => {
            BuildStatus::new(started.elapsed()).error("build failed", &format!("{err:#}"));
            Err(err).context("build failed")
        }
    }
}

/// Plain HTML pages: an `index.html` source is its own shell.
///
/// Its output path is also the page document, so page generation leaves
/// the file in place when the shell is unchanged.
pub fn install_defaults(mediator: &mut Mediator) {
    mediator.set_page_handler("html", html_shell);
}

fn html_shell(input: PageInput<'_>) -> anyhow::Result<Option<String>> {
    let shell = fs::read_to_string(input.output)
        .with_context(|| format!("failed to read {}", input.output.display()))?;
    Ok(Some(shell))
}

/// Remove the build directory if present.
pub fn clean_build_dir(build_dir: &Path) -> Result<()> {
    if build_dir.exists() {
        fs::remove_dir_all(build_dir)
            .with_context(|| format!("failed to remove {}", build_dir.display()))?;
        crate::debug!("build"; "removed {}", build_dir.display());
    }
    Ok(())
}

fn summary(report: &BuildReport) -> String {
    let discovery = &report.discovery;
    let mut parts = vec![
        plural_count(discovery.total(), "file"),
        format!("{} compiled", report.compiled),
        plural_count(report.pages.generated + report.pages.reused, "page"),
    ];
    if report.pages.failed > 0 {
        parts.push(format!("{} failed", report.pages.failed));
    }
    format!("built {}", parts.join(", "))
}

fn plural_count(count: usize, noun: &str) -> String {
    format!("{count} {noun}{}", if count == 1 { "" } else { "s" })
}
