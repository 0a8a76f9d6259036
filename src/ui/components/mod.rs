//! Composable UI component renderers.
//!
//! Each component appends one part of the frame to a `String` buffer and
//! returns the next free row.
//!
//! # Components
//!
//! - [`header`]: title bar
//! - [`footer`]: keybinding hints
//! - [`search`]: search box with result count
//! - [`list`]: result rows with match highlights
//! - [`message`]: centered status messages
//! - [`preview`]: the chosen chart
//!
//! # Layouts
//!
//! - [`render_browse_layout`]: Header + `SearchBar` + List + Footer
//! - [`render_message_layout`]: Header + Message + Footer
//! - [`render_preview_layout`]: Header + Preview + Footer

mod footer;
mod header;
mod list;
mod message;
mod preview;
mod search;

use crate::ui::helpers::position_cursor;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{BrowseInfo, FooterInfo, HeaderInfo, MessageInfo, PreviewInfo};

use footer::render_footer;
use header::render_header;
use list::{render_list_headers, render_list_rows};
use message::render_message;
use preview::render_preview;
use search::render_search_bar;

/// Row the message and preview bodies start on.
const BODY_ROW: usize = 6;

fn render_border(out: &mut String, row: usize, color: &str, cols: usize) -> usize {
    position_cursor(out, row, 1);
    out.push_str(&Theme::fg(color));
    out.push_str(&"─".repeat(cols));
    out.push_str(Theme::reset());
    row + 1
}

/// Header and top border; returns the first body row.
fn render_top(out: &mut String, header: &HeaderInfo, theme: &Theme, cols: usize) -> usize {
    let row = render_header(out, 2, header, theme, cols);
    render_border(out, row, &theme.colors.border, cols)
}

/// Bottom border and footer on the last two lines.
fn render_bottom(out: &mut String, footer: &FooterInfo, theme: &Theme, cols: usize, rows: usize) {
    let footer_row = rows.saturating_sub(1).max(1);
    render_border(out, footer_row.saturating_sub(1).max(1), &theme.colors.border, cols);
    render_footer(out, footer_row, footer, theme, cols);
}

/// Search box, column headings and result rows.
///
/// ```text
/// [blank line]
/// [Header]
/// [Border]
/// [Search Bar - 3 lines]
/// [List Headers]
/// [List Rows | no-match message]
/// [Border]
/// [Footer]
/// ```
pub fn render_browse_layout(
    out: &mut String,
    header: &HeaderInfo,
    browse: &BrowseInfo,
    footer: &FooterInfo,
    theme: &Theme,
    cols: usize,
    rows: usize,
) {
    let row = render_top(out, header, theme, cols);
    let row = render_search_bar(out, row, &browse.search_bar, theme, cols);

    if let Some(no_matches) = &browse.no_matches {
        render_message(out, row + 1, no_matches, theme, cols);
    } else {
        let row = render_list_headers(out, row, theme, cols);
        render_list_rows(out, row, &browse.rows, theme, cols);
    }

    render_bottom(out, footer, theme, cols, rows);
}

/// Error, loading and empty-catalog screens.
pub fn render_message_layout(
    out: &mut String,
    header: &HeaderInfo,
    message: &MessageInfo,
    footer: &FooterInfo,
    theme: &Theme,
    cols: usize,
    rows: usize,
) {
    render_top(out, header, theme, cols);
    render_message(out, BODY_ROW, message, theme, cols);
    render_bottom(out, footer, theme, cols, rows);
}

/// The chosen chart.
pub fn render_preview_layout(
    out: &mut String,
    header: &HeaderInfo,
    preview: &PreviewInfo,
    footer: &FooterInfo,
    theme: &Theme,
    cols: usize,
    rows: usize,
) {
    render_top(out, header, theme, cols);
    render_preview(out, BODY_ROW, preview, theme, cols);
    render_bottom(out, footer, theme, cols, rows);
}
