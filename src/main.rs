//! Kiln - build orchestration CLI.

use anyhow::{Context, Result};
use clap::{ColorChoice, Parser};

use kiln::cli::{Cli, Commands, build, routes};
use kiln::config::KilnConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    let config = KilnConfig::load(&cli)?;

    match &cli.command {
        Commands::Build { .. } => runtime()?
            .block_on(build::build_project(&config))
            .map(|_| ()),
        Commands::Routes { .. } => {
            let mediator = runtime()?.block_on(build::build_project(&config))?;
            routes::print_routes(&mediator.route_table(), &mut std::io::stdout().lock())
        }
        Commands::Clean => build::clean_build_dir(&config.build_dir()),
    }
}

/// Current-thread runtime for the async bundling stage.
fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")
}
