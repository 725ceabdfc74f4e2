//! Terminal output utilities.
//!
//! Provides formatting helpers for terminal output.

use colored::{ColoredString, Colorize};

/// Render a count of ranges, e.g. `0 ranges`, `1 range`, `12 ranges`.
pub fn ranges_label(count: usize) -> String {
    if count == 1 {
        "1 range".to_string()
    } else {
        format!("{count} ranges")
    }
}

/// Colored marker for a status line.
pub fn marker(ok: bool) -> ColoredString {
    if ok {
        "✓".green()
    } else {
        "✗".red()
    }
}

/// Colored warning marker for partial success.
pub fn warning(text: &str) -> ColoredString {
    text.on_red()
}
