//! Centered message component renderer.
//!
//! Used for the error, loading and empty-catalog screens, and for the
//! no-match notice under the search box.

use crate::ui::helpers::{position_cursor, push_centered};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{MessageInfo, Tone};

/// Renders the message and its dimmed subtitle on two lines from `row`.
pub fn render_message(out: &mut String, row: usize, message: &MessageInfo, theme: &Theme, cols: usize) -> usize {
    let color = match message.tone {
        Tone::Error => &theme.colors.error_fg,
        Tone::Info => &theme.colors.empty_state_fg,
    };

    position_cursor(out, row, 1);
    out.push_str(&Theme::fg(color));
    push_centered(out, &message.message, cols);
    out.push_str(Theme::reset());

    if message.subtitle.is_empty() {
        return row + 1;
    }

    position_cursor(out, row + 1, 1);
    out.push_str(Theme::dim());
    out.push_str(&Theme::fg(&theme.colors.text_dim));
    push_centered(out, &message.subtitle, cols);
    out.push_str(Theme::reset());
    row + 2
}
