//! Search box component renderer.
//!
//! A three-line bordered box holding the query on the left and the result
//! count (`"N of M"`) on the right:
//!
//! ```text
//!      ┌──────────────────────────────────────┐
//!      │ Search: sales                 2 of 5 │
//!      └──────────────────────────────────────┘
//! ```

use crate::ui::helpers::{position_cursor, width};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::SearchBarInfo;

/// Horizontal margin on each side of the box.
const SEARCH_BOX_MARGIN: usize = 5;

/// Renders the search box starting at `row`. Returns the row after it.
pub fn render_search_bar(out: &mut String, row: usize, search: &SearchBarInfo, theme: &Theme, cols: usize) -> usize {
    let box_width = cols.saturating_sub(SEARCH_BOX_MARGIN * 2);
    let inner_width = box_width.saturating_sub(2);
    let margin = " ".repeat(SEARCH_BOX_MARGIN);
    let border = Theme::fg(&theme.colors.search_bar_border);

    position_cursor(out, row, 1);
    out.push_str(&margin);
    out.push_str(&border);
    out.push('┌');
    out.push_str(&"─".repeat(inner_width));
    out.push('┐');
    out.push_str(Theme::reset());

    let query = format!(" Search: {}", search.query);
    let count = format!("{} ", search.count_label);
    let gap = inner_width.saturating_sub(width(&query) + width(&count));

    position_cursor(out, row + 1, 1);
    out.push_str(&margin);
    out.push_str(&border);
    out.push('│');
    out.push_str(&Theme::fg(&theme.colors.text_normal));
    out.extend(query.chars().take(inner_width));
    out.push_str(&" ".repeat(gap));
    if width(&query) + width(&count) <= inner_width {
        out.push_str(&Theme::fg(&theme.colors.text_dim));
        out.push_str(&count);
    }
    out.push_str(&border);
    out.push('│');
    out.push_str(Theme::reset());

    position_cursor(out, row + 2, 1);
    out.push_str(&margin);
    out.push_str(&border);
    out.push('└');
    out.push_str(&"─".repeat(inner_width));
    out.push('┘');
    out.push_str(Theme::reset());

    row + 3
}
