//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Kiln build orchestrator CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Directory to start the config search from (default: cwd)
    #[arg(short, long, global = true, value_hint = clap::ValueHint::DirPath)]
    pub root: Option<PathBuf>,

    /// Config file path (default: kiln.toml)
    #[arg(short = 'C', long, global = true, default_value = "kiln.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Build the project
    #[command(visible_alias = "b")]
    Build {
        #[command(flatten)]
        build_args: BuildArgs,
    },

    /// Build the project and print its route table
    #[command(visible_alias = "r")]
    Routes {
        #[command(flatten)]
        build_args: BuildArgs,
    },

    /// Remove the build directory
    Clean,
}

/// Shared build arguments for Build and Routes commands
#[derive(clap::Args, Debug, Clone)]
pub struct BuildArgs {
    /// Remove the build directory (outputs and cache) before building
    #[arg(short, long)]
    pub clean: bool,

    /// Run the server-render pass
    #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub ssr: Option<bool>,

    /// Minify bundled page dependencies
    #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub minify: Option<bool>,

    /// Source directory, relative to the project root (repeatable)
    #[arg(short = 'd', long = "dir", value_hint = clap::ValueHint::DirPath)]
    pub dirs: Vec<PathBuf>,

    /// Build directory, relative to the project root
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub output: Option<PathBuf>,

    /// Print debug output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub const fn is_build(&self) -> bool {
        matches!(self.command, Commands::Build { .. } | Commands::Routes { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_build() {
        let cli = Cli::try_parse_from(["kiln", "build", "--ssr", "-d", "public", "-d", "assets"]).unwrap();
        let Commands::Build { build_args } = cli.command else {
            panic!("expected build");
        };
        assert_eq!(build_args.ssr, Some(true));
        assert_eq!(build_args.minify, None);
        assert_eq!(build_args.dirs.len(), 2);
        assert_eq!(cli.config, PathBuf::from("kiln.toml"));
    }

    #[test]
    fn test_parse_clean() {
        let cli = Cli::try_parse_from(["kiln", "clean", "-C", "site.toml"]).unwrap();
        assert!(matches!(cli.command, Commands::Clean));
        assert!(!cli.is_build());
        assert_eq!(cli.config, PathBuf::from("site.toml"));
    }
}
