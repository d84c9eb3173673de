//! Project configuration management for `kiln.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section.rs     # [build]
//! ├── error.rs       # ConfigError
//! ├── util.rs        # config file discovery
//! └── mod.rs         # KilnConfig (this file)
//! ```

mod error;
mod section;
mod util;

pub use error::ConfigError;
pub use section::BuildSection;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::cli::{BuildArgs, Cli, Commands};
use crate::log;
use util::find_config_file;

/// Root configuration structure representing kiln.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KilnConfig {
    /// Absolute path to the config file, empty when none was found
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file
    #[serde(skip)]
    pub root: PathBuf,

    /// Build settings
    #[serde(default)]
    pub build: BuildSection,
}

impl KilnConfig {
    /// Load configuration for a CLI invocation.
    ///
    /// Searches upward from `--root` (or cwd) for the config file. Without
    /// one, defaults apply and the start directory becomes the project root.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;
        let start = match &cli.root {
            Some(root) => cwd.join(root),
            None => cwd,
        };

        let mut config = match find_config_file(&start, &cli.config) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                config.root = path.parent().map(Path::to_path_buf).unwrap_or_default();
                config.config_path = path;
                config
            }
            None => Self {
                root: start,
                ..Self::default()
            },
        };

        if let Commands::Build { build_args } | Commands::Routes { build_args } = &cli.command {
            config.apply_build_args(build_args);
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from file path, warning about unknown fields.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring: {}", display_path, fields.join(", "));
    }

    /// Apply build arguments from CLI. CLI flags override the file.
    pub fn apply_build_args(&mut self, args: &BuildArgs) {
        crate::logger::set_verbose(args.verbose);

        Self::update_option(&mut self.build.ssr, args.ssr.as_ref());
        Self::update_option(&mut self.build.minify, args.minify.as_ref());
        if !args.dirs.is_empty() {
            self.build.dirs.clone_from(&args.dirs);
        }
        if let Some(output) = &args.output {
            self.build.output.clone_from(output);
        }
        self.build.clean = args.clean;
    }

    fn update_option<T: Clone>(target: &mut T, value: Option<&T>) {
        if let Some(v) = value {
            *target = v.clone();
        }
    }

    /// Reject settings the pipeline cannot build with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.build.dirs.is_empty() {
            return Err(ConfigError::Validation(
                "[build] dirs must name at least one source directory".into(),
            ));
        }

        let build_dir = self.build_dir();
        for dir in &self.build.dirs {
            let source = self.root.join(dir);
            if build_dir.starts_with(&source) {
                return Err(ConfigError::Validation(format!(
                    "[build] output `{}` must not be inside source directory `{}`",
                    self.build.output.display(),
                    dir.display()
                )));
            }
        }

        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute build directory.
    pub fn build_dir(&self) -> PathBuf {
        self.root.join(&self.build.output)
    }

    pub fn source_dirs(&self) -> &[PathBuf] {
        &self.build.dirs
    }

    /// Build deadline, `None` when disabled.
    pub fn timeout(&self) -> Option<Duration> {
        (self.build.timeout > 0).then(|| Duration::from_secs(self.build.timeout))
    }
}
