//! Common helper functions for output formatting.

use chrono::{DateTime, Local, Utc};
use owo_colors::OwoColorize;

/// Truncates an ID to 8 characters for display.
pub fn truncate_id(id: &str) -> String {
    id.chars().take(8).collect()
}

/// Truncates a string to a maximum length in characters.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    } else {
        s.to_string()
    }
}

/// Formats a save timestamp in local time.
pub fn format_saved_at(saved_at: &DateTime<Utc>) -> String {
    saved_at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

/// Formats an evaluation outcome.
pub fn format_outcome(matched: bool, use_colors: bool) -> String {
    let label = matched.to_string();
    if !use_colors {
        return label;
    }
    if matched {
        label.green().to_string()
    } else {
        label.red().to_string()
    }
}

/// Formats a table header, dimmed when colors are on.
pub fn format_header(header: &str, use_colors: bool) -> String {
    if use_colors {
        format!("{}\n", header.dimmed())
    } else {
        format!("{header}\n")
    }
}
