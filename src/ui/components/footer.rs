//! Footer component renderer.
//!
//! Shows the keybinding hints of the current render state, centered and
//! dimmed, on the last line of the pane.

use crate::ui::helpers::{position_cursor, push_centered};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::FooterInfo;

/// Renders the footer at `row`. Hints wider than the pane are cut.
pub fn render_footer(out: &mut String, row: usize, footer: &FooterInfo, theme: &Theme, cols: usize) -> usize {
    position_cursor(out, row, 1);
    out.push_str(&Theme::fg(&theme.colors.text_dim));
    push_centered(out, &footer.keybindings, cols);
    out.push_str(Theme::reset());
    row + 1
}
