//! Route table printing.

use std::io::Write;

use anyhow::Result;
use owo_colors::OwoColorize;

use crate::mediator::{RouteContent, RouteEntry};

/// One line per route: route, kind, backing file.
pub fn print_routes(routes: &[RouteEntry], out: &mut impl Write) -> Result<()> {
    for entry in routes {
        writeln!(out, "{}", format_entry(entry))?;
    }
    Ok(())
}

fn format_entry(entry: &RouteEntry) -> String {
    let kind = match &entry.content {
        RouteContent::Render(_) => "ssr".bright_green().to_string(),
        RouteContent::Static(_) if entry.original.is_none() => "page".bright_blue().to_string(),
        RouteContent::Static(_) => "file".dimmed().to_string(),
    };
    let source = entry
        .original
        .as_ref()
        .map(|original| format!(" <- {original}"))
        .unwrap_or_default();
    format!("{kind:>4} {}{source}", entry.route)
}
