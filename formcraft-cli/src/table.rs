//! Terminal-aware tables.

use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};

/// A table sized to the terminal, or 120 columns when not on a TTY.
pub fn new_table() -> Table {
    let width = crossterm::terminal::size().map(|(w, _)| w).unwrap_or(120);

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_width(width);
    table
}

/// Truncate to `max` characters, appending "..." if cut.
pub fn truncate_str(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

/// "yes" or empty, for boolean columns.
pub fn flag(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        ""
    }
}
