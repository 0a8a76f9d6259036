//! Selected-chart preview renderer.
//!
//! A terminal pane cannot draw the preview image itself, so the image
//! variant shows the title and the cache-busted image URL as a link. Items
//! without an image show their title alone, and with image support off the
//! item's metadata is shown as a text card.

use crate::ui::helpers::{position_cursor, push_centered};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::PreviewInfo;

/// Renders the preview block from `row`. Returns the next free row.
pub fn render_preview(out: &mut String, row: usize, preview: &PreviewInfo, theme: &Theme, cols: usize) -> usize {
    match preview {
        PreviewInfo::Image { title, url } => {
            let row = push_line(out, row, title, &theme.colors.text_normal, true, cols);
            let row = row + 1;
            position_cursor(out, row, 1);
            out.push_str(Theme::underline());
            out.push_str(&Theme::fg(&theme.colors.link_fg));
            push_centered(out, url, cols);
            out.push_str(Theme::reset());
            row + 1
        }
        PreviewInfo::Card {
            title,
            subtitle,
            kind,
            aspect_ratio,
        } => {
            let mut row = push_line(out, row, title, &theme.colors.text_normal, true, cols);
            if let Some(subtitle) = subtitle {
                row = push_line(out, row, subtitle, &theme.colors.text_dim, false, cols);
            }
            row += 1;
            if !kind.is_empty() {
                row = push_line(out, row, &format!("Type: {kind}"), &theme.colors.text_dim, false, cols);
            }
            if let Some(ratio) = aspect_ratio {
                row = push_line(out, row, &format!("Aspect ratio: {ratio:.2}"), &theme.colors.text_dim, false, cols);
            }
            row
        }
        PreviewInfo::TitleOnly { title } => push_line(out, row, title, &theme.colors.text_normal, true, cols),
        PreviewInfo::Missing { label } => {
            let row = push_line(out, row, label, &theme.colors.chosen_fg, true, cols);
            push_line(out, row, "Not in the current results", &theme.colors.text_dim, false, cols)
        }
    }
}

fn push_line(out: &mut String, row: usize, text: &str, color: &str, bold: bool, cols: usize) -> usize {
    position_cursor(out, row, 1);
    if bold {
        out.push_str(Theme::bold());
    }
    out.push_str(&Theme::fg(color));
    push_centered(out, text, cols);
    out.push_str(Theme::reset());
    row + 1
}
