//! Logging utilities with colored output.
//!
//! This module provides:
//! - `log!` macro for formatted terminal output with colored prefixes
//! - `debug!` macro, only printed with `--verbose`
//! - `BuildStatus` for the final one-line build summary
//!
//! # Example
//!
//! ```ignore
//! log!("prepare"; "{} cached, {} updated, {} new", cached, updated, new);
//! debug!("cache"; "persisted {} entries", count);
//! ```

use crossterm::{
    execute,
    terminal::{Clear, ClearType},
};
use owo_colors::OwoColorize;
use std::{
    io::{Write, stdout},
    sync::atomic::{AtomicBool, Ordering},
    time::Duration,
};

/// Global verbose flag (set by --verbose CLI argument)
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Set verbose mode globally
pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::SeqCst);
}

/// Check if verbose mode is enabled
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

// ============================================================================
// Log Macro
// ============================================================================

/// Log a message with a colored module prefix
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Log a debug message (only shown when --verbose is enabled)
///
/// # Usage
/// ```ignore
/// debug!("module"; "debug info: {}", value);
/// ```
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Log a message with a colored module prefix
#[inline]
pub fn log(module: &str, message: &str) {
    let module_lower = module.to_ascii_lowercase();
    let prefix = colorize_prefix(module, &module_lower);

    let mut stdout = stdout().lock();
    execute!(stdout, Clear(ClearType::UntilNewLine)).ok();
    writeln!(stdout, "{prefix} {message}").ok();
    stdout.flush().ok();
}

/// Apply color to a module prefix based on module type
#[inline]
fn colorize_prefix(module: &str, module_lower: &str) -> String {
    let prefix = format!("[{module}]");
    match module_lower {
        "build" | "kiln" => prefix.bright_blue().bold().to_string(),
        "page" | "bundle" => prefix.bright_green().bold().to_string(),
        "error" => prefix.bright_red().bold().to_string(),
        "warning" | "hint" => prefix.bright_magenta().bold().to_string(),
        _ => prefix.bright_yellow().bold().to_string(),
    }
}

// ============================================================================
// Build Status
// ============================================================================

/// Final build summary line.
///
/// ```ignore
/// BuildStatus::new(elapsed).success("12 routes");
/// BuildStatus::new(elapsed).error("build failed", &format!("{err:#}"));
/// ```
pub struct BuildStatus {
    elapsed: Duration,
}

impl BuildStatus {
    pub const fn new(elapsed: Duration) -> Self {
        Self { elapsed }
    }

    /// Print a success summary (✓ prefix, green).
    pub fn success(&self, message: &str) {
        self.display(&format!("{}", "✓".green()), message);
    }

    /// Print a failure summary (✗ prefix, red) with optional detail.
    pub fn error(&self, summary: &str, detail: &str) {
        let message = if detail.is_empty() {
            summary.to_string()
        } else {
            format!("{summary}\n{detail}")
        };
        self.display(&format!("{}", "✗".red()), &message);
    }

    fn display(&self, symbol: &str, message: &str) {
        let timing = format!("({})", format_elapsed(self.elapsed)).dimmed().to_string();
        let mut stdout = stdout().lock();
        writeln!(stdout, "{symbol} {message} {timing}").ok();
        stdout.flush().ok();
    }
}

/// Format a duration as `850ms` or `1.42s`.
fn format_elapsed(elapsed: Duration) -> String {
    let millis = elapsed.as_millis();
    if millis < 1000 {
        format!("{millis}ms")
    } else {
        format!("{:.2}s", elapsed.as_secs_f64())
    }
}
