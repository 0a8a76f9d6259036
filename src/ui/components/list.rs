//! Result list component renderer.
//!
//! One line per [`DisplayItem`]: a chosen marker, the title with fuzzy-match
//! highlights, then the dimmed detail column. The cursor row is drawn with
//! the selection colors across the full width.

use crate::ui::helpers::{self, position_cursor, width};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::DisplayItem;

const MARKER: &str = "* ";
const MARKER_WIDTH: usize = 2;

/// Renders the column headings. Returns the next free row.
pub fn render_list_headers(out: &mut String, row: usize, theme: &Theme, cols: usize) -> usize {
    let title_column = title_column_width(cols);

    position_cursor(out, row, 1);
    out.push_str(Theme::bold());
    out.push_str(&Theme::fg(&theme.colors.header_fg));
    out.push_str(&format!("{:<width$}{}", "  TITLE", "TYPE", width = title_column + MARKER_WIDTH));
    out.push_str(Theme::reset());
    row + 1
}

/// Renders every row. Returns the row after the last one.
pub fn render_list_rows(out: &mut String, row: usize, items: &[DisplayItem], theme: &Theme, cols: usize) -> usize {
    items
        .iter()
        .fold(row, |current_row, item| render_list_row(out, current_row, item, theme, cols))
}

fn render_list_row(out: &mut String, row: usize, item: &DisplayItem, theme: &Theme, cols: usize) -> usize {
    let title_column = title_column_width(cols);
    position_cursor(out, row, 1);

    let base = if item.is_highlighted {
        format!(
            "{}{}",
            Theme::fg(&theme.colors.selection_fg),
            Theme::bg(&theme.colors.selection_bg)
        )
    } else {
        Theme::fg(&theme.colors.text_normal)
    };
    out.push_str(&base);

    if item.is_chosen {
        out.push_str(&Theme::fg(&theme.colors.chosen_fg));
        out.push_str(MARKER);
        out.push_str(&base);
    } else {
        out.push_str(&" ".repeat(MARKER_WIDTH));
    }

    helpers::push_highlighted_text(out, &item.title, &item.highlight_ranges, theme, item.is_highlighted);
    out.push_str(&" ".repeat(title_column.saturating_sub(width(&item.title))));

    if !item.is_highlighted {
        out.push_str(&Theme::fg(&theme.colors.text_dim));
    }
    let detail_width = cols.saturating_sub(MARKER_WIDTH + title_column.max(width(&item.title)));
    out.extend(item.detail.chars().take(detail_width));
    out.push_str(&" ".repeat(detail_width.saturating_sub(width(&item.detail))));

    out.push_str(Theme::reset());
    row + 1
}

/// Width of the title column: half the pane, at least one column.
fn title_column_width(cols: usize) -> usize {
    (cols.saturating_sub(MARKER_WIDTH) / 2).max(1)
}
