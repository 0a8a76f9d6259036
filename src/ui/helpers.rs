//! Shared rendering utilities.
//!
//! Components write into a `String` frame buffer instead of stdout, which lets
//! the whole frame be assembled (and inspected in tests) before it is printed.
//! All widths are counted in characters, not bytes.

use crate::ui::theme::Theme;

/// Moves the cursor to a 1-indexed `row` and `col`.
pub fn position_cursor(out: &mut String, row: usize, col: usize) {
    out.push_str(&format!("\u{1b}[{row};{col}H"));
}

/// Display width of `text` in terminal columns.
#[must_use]
pub fn width(text: &str) -> usize {
    text.chars().count()
}

/// Writes `text` centered in `cols` columns, padded on both sides.
pub fn push_centered(out: &mut String, text: &str, cols: usize) {
    let len = width(text).min(cols);
    let padding = cols.saturating_sub(len) / 2;

    out.push_str(&" ".repeat(padding));
    out.extend(text.chars().take(len));
    out.push_str(&" ".repeat(cols.saturating_sub(padding + len)));
}

/// Writes `text` with the character ranges `(start, end)` highlighted.
///
/// Highlighting is skipped on the cursor row so it does not fight the
/// selection background.
pub fn push_highlighted_text(out: &mut String, text: &str, ranges: &[(usize, usize)], theme: &Theme, is_highlighted: bool) {
    if ranges.is_empty() || is_highlighted {
        out.push_str(text);
        return;
    }

    let chars: Vec<char> = text.chars().collect();
    let mut current_pos = 0;

    for &(start, end) in ranges {
        let start = start.min(chars.len());
        let end = end.min(chars.len());
        if start < current_pos || start >= end {
            continue;
        }

        out.extend(&chars[current_pos..start]);
        out.push_str(&Theme::fg(&theme.colors.match_highlight_fg));
        out.push_str(&Theme::bg(&theme.colors.match_highlight_bg));
        out.extend(&chars[start..end]);
        out.push_str(Theme::reset());
        out.push_str(&Theme::fg(&theme.colors.text_normal));

        current_pos = end;
    }

    out.extend(&chars[current_pos..]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_text_fills_the_line() {
        let mut out = String::new();
        push_centered(&mut out, "ab", 6);
        assert_eq!(out, "  ab  ");

        out.clear();
        push_centered(&mut out, "↑/↓", 5);
        assert_eq!(out, " ↑/↓ ");
    }

    #[test]
    fn highlighted_text_keeps_every_character() {
        let theme = Theme::default();
        let mut out = String::new();
        push_highlighted_text(&mut out, "sales", &[(0, 2), (4, 9)], &theme, false);

        let plain: String = strip_ansi(&out);
        assert_eq!(plain, "sales");
        assert!(out.contains(&Theme::bg(&theme.colors.match_highlight_bg)));

        out.clear();
        push_highlighted_text(&mut out, "sales", &[(0, 2)], &theme, true);
        assert_eq!(out, "sales");
    }

    fn strip_ansi(text: &str) -> String {
        let mut plain = String::new();
        let mut in_escape = false;
        for c in text.chars() {
            match (in_escape, c) {
                (false, '\u{1b}') => in_escape = true,
                (true, 'm' | 'H') => in_escape = false,
                (false, c) => plain.push(c),
                (true, _) => {}
            }
        }
        plain
    }
}
