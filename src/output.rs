//! CLI output formatting for every command.
//!
//! # Information-First Display
//!
//! Every entity leads with its positional index and name; links, cover URLs
//! and geometry follow as indented context lines. The same header shape is
//! used by `search`, `select` and `history` so an item reads the same
//! wherever it appears.
//!
//! # Output Format
//!
//! ## Search
//!
//! ```text
//! Results for "blue" (album,track): 2
//! 001 Blue [album]
//!     Joni Mitchell
//!     https://open.spotify.com/album/alb1
//! 002 A Case of You [track]
//!     Joni Mitchell
//! ```
//!
//! ## Select
//!
//! ```text
//! Selected Blue [album]
//!     Subtitle: Joni Mitchell
//!     Link: https://open.spotify.com/album/alb1
//!     Cover: https://i.example/blue-640.jpg
//!     Code: https://scannables.scdn.co/...
//! ```
//!
//! ## Compose
//!
//! ```text
//! Composite 1080x1350 → ./spotify-album-alb1.png
//!     cover: 742x742 at (169, 86)
//!     code: 742x186 at (169, 871)
//!     qr: 163x163 at (169, 1100)
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::compose::Composite;
use crate::layout::ImageSlot;
use crate::resolution::PRESETS;
use crate::types::{CatalogItem, SearchResponse};
use std::path::Path;

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Name plus type tag.
///
/// ```text
/// Blue [album]
/// ```
fn item_title(item: &CatalogItem) -> String {
    format!("{} [{}]", item.name, item.item_type)
}

fn slot_label(slot: ImageSlot) -> &'static str {
    match slot {
        ImageSlot::Cover => "cover",
        ImageSlot::Code => "code",
        ImageSlot::Qr => "qr",
    }
}

// ============================================================================
// search
// ============================================================================

/// Format a search response as a numbered list; the numbers are what
/// `covercard select` takes.
pub fn format_search_results(response: &SearchResponse) -> Vec<String> {
    let mut lines = vec![format!(
        "Results for \"{}\" ({}): {}",
        response.query, response.types, response.count
    )];
    if response.results.is_empty() {
        lines.push(format!("{}No matches", indent(1)));
        return lines;
    }
    for (i, item) in response.results.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), item_title(item)));
        if let Some(subtitle) = item.display_subtitle() {
            lines.push(format!("{}{}", indent(1), subtitle));
        }
        if let Some(url) = &item.url {
            lines.push(format!("{}{}", indent(1), url));
        }
    }
    lines
}

pub fn print_search_results(response: &SearchResponse) {
    for line in format_search_results(response) {
        println!("{}", line);
    }
}

// ============================================================================
// select
// ============================================================================

/// Format the current selection with all of its links.
pub fn format_selection(item: Option<&CatalogItem>) -> Vec<String> {
    let Some(item) = item else {
        return vec!["Nothing selected".to_string()];
    };
    let mut lines = vec![format!("Selected {}", item_title(item))];
    let fields = [
        ("Subtitle", item.display_subtitle()),
        ("Link", item.url.as_deref()),
        ("Cover", item.cover_url.as_deref()),
        ("Code", item.code_url.as_deref()),
    ];
    for (label, value) in fields {
        if let Some(value) = value {
            lines.push(format!("{}{}: {}", indent(1), label, value));
        }
    }
    lines
}

pub fn print_selection(item: Option<&CatalogItem>) {
    for line in format_selection(item) {
        println!("{}", line);
    }
}

// ============================================================================
// compose
// ============================================================================

/// Format a finished composite: output path, then one line per image block.
pub fn format_composite(composite: &Composite, path: &Path) -> Vec<String> {
    let mut lines = vec![format!(
        "Composite {} \u{2192} {}",
        composite.resolution,
        path.display()
    )];
    for op in composite.plan.images() {
        lines.push(format!(
            "{}{}: {}x{} at ({}, {})",
            indent(1),
            slot_label(op.slot),
            op.w.round(),
            op.h.round(),
            op.x.round(),
            op.y.round()
        ));
    }
    lines
}

pub fn print_composite(composite: &Composite, path: &Path) {
    for line in format_composite(composite, path) {
        println!("{}", line);
    }
}

// ============================================================================
// history / presets
// ============================================================================

pub fn format_history(entries: &[String]) -> Vec<String> {
    if entries.is_empty() {
        return vec!["No searches yet".to_string()];
    }
    entries
        .iter()
        .enumerate()
        .map(|(i, q)| format!("{} {}", format_index(i + 1), q))
        .collect()
}

pub fn print_history(entries: &[String]) {
    for line in format_history(entries) {
        println!("{}", line);
    }
}

/// List presets, marking the configured default.
pub fn format_presets(default: &str) -> Vec<String> {
    let width = PRESETS.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    PRESETS
        .iter()
        .map(|(name, res)| {
            let marker = if *name == default { " (default)" } else { "" };
            format!("{:<width$}  {}{}", name, res, marker)
        })
        .collect()
}

pub fn print_presets(default: &str) {
    for line in format_presets(default) {
        println!("{}", line);
    }
}
