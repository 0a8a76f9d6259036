//! View model types and their computation from the controller.
//!
//! The renderer never looks at [`SelectionState`] directly. Each frame,
//! [`compute_viewmodel`] turns the state into display-ready data: which
//! body to show for the current [`ViewState`], the visible window of rows,
//! fuzzy-match highlight ranges and the footer hints.

use crate::app::{PickerController, SelectionState, ViewState};
use crate::domain::CatalogItem;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

pub const TITLE: &str = "Chart Picker";
pub const FETCH_ERROR_MESSAGE: &str = "There is a problem fetching charts";
pub const EMPTY_CATALOG_MESSAGE: &str = "No Charts found";
pub const CREATE_CHART_HINT: &str = "Create a new chart";
pub const NO_MATCHES_MESSAGE: &str = "No Charts found using this search string";
pub const LOADING_MESSAGE: &str = "Loading charts";
pub const ACCESS_DENIED_HINT: &str = "Web access was denied; grant it and reload the plugin";

/// Frames of the loading spinner.
pub const SPINNER: [char; 4] = ['|', '/', '-', '\\'];

/// Lines taken by header, borders, search box and footer in browse layout.
const BROWSE_CHROME_ROWS: usize = 9;

/// Complete UI view model for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct UIViewModel {
    pub header: HeaderInfo,
    pub body: Body,
    pub footer: FooterInfo,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderInfo {
    pub title: String,
}

/// Keybinding hints for the bottom line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooterInfo {
    pub keybindings: String,
}

/// Main area content, one variant per render state family.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// Error, loading and empty-catalog screens.
    Message(MessageInfo),
    /// Search box plus result list.
    Browse(BrowseInfo),
    /// The chosen chart.
    Preview(PreviewInfo),
}

/// Tone of a centered message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Error,
    Info,
}

/// Centered two-line message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageInfo {
    pub message: String,
    pub subtitle: String,
    pub tone: Tone,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchBarInfo {
    pub query: String,
    /// `"N of M"`.
    pub count_label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BrowseInfo {
    pub search_bar: SearchBarInfo,
    /// Visible window of the result list.
    pub rows: Vec<DisplayItem>,
    /// Shown instead of rows when a search matched nothing.
    pub no_matches: Option<MessageInfo>,
}

/// One row of the result list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayItem {
    pub title: String,
    /// Subtitle, or the category tag when there is none.
    pub detail: String,
    /// Row under the list cursor.
    pub is_highlighted: bool,
    /// Row of the chart currently chosen.
    pub is_chosen: bool,
    /// Character ranges `(start, end)` matching the search text.
    pub highlight_ranges: Vec<(usize, usize)>,
}

/// What the Selected screen shows.
#[derive(Debug, Clone, PartialEq)]
pub enum PreviewInfo {
    /// Preview image available.
    Image { title: String, url: String },
    /// Image support off: the item's metadata as text.
    Card {
        title: String,
        subtitle: Option<String>,
        kind: String,
        aspect_ratio: Option<f64>,
    },
    /// Image support on but the item has no preview.
    TitleOnly { title: String },
    /// Selected id is not among the current results.
    Missing { label: String },
}

/// Computes the view model for the current frame.
#[must_use]
pub fn compute_viewmodel(controller: &PickerController, rows: usize, cols: usize) -> UIViewModel {
    let state = controller.state();
    let view_state = state.view_state();

    let body = match view_state {
        ViewState::Error => Body::Message(MessageInfo {
            message: FETCH_ERROR_MESSAGE.to_string(),
            subtitle: if state.access_denied {
                ACCESS_DENIED_HINT.to_string()
            } else {
                "Press r to retry".to_string()
            },
            tone: Tone::Error,
        }),
        ViewState::Loading => Body::Message(MessageInfo {
            message: format!("{} {LOADING_MESSAGE}", SPINNER[0]),
            subtitle: String::new(),
            tone: Tone::Info,
        }),
        ViewState::EmptyCatalog => Body::Message(MessageInfo {
            message: EMPTY_CATALOG_MESSAGE.to_string(),
            subtitle: CREATE_CHART_HINT.to_string(),
            tone: Tone::Info,
        }),
        ViewState::Selected => Body::Preview(compute_preview(controller)),
        ViewState::Browsing => Body::Browse(compute_browse(state, rows, cols)),
    };

    let keybindings = if state.access_denied {
        footer_hints(ViewState::Loading)
    } else {
        footer_hints(view_state)
    };

    UIViewModel {
        header: HeaderInfo {
            title: TITLE.to_string(),
        },
        body,
        footer: FooterInfo {
            keybindings: keybindings.to_string(),
        },
    }
}

/// Keybinding hints for a render state.
#[must_use]
pub const fn footer_hints(view_state: ViewState) -> &'static str {
    match view_state {
        ViewState::Error => "r: retry | Esc: close",
        ViewState::Loading => "Esc: close",
        ViewState::Selected => "r: replace | e: edit | n: new chart | Esc: close",
        ViewState::EmptyCatalog => "n: create a new chart | Esc: close",
        ViewState::Browsing => "type: search | ↑/↓: move | Enter: select | Ctrl+o: new chart | Esc: close",
    }
}

fn compute_preview(controller: &PickerController) -> PreviewInfo {
    let state = controller.state();

    let Some(item) = state.selected_item() else {
        // Selection survives searches that no longer contain it.
        let label = state
            .selected_id
            .as_ref()
            .map_or_else(String::new, |id| format!("Chart #{id}"));
        return PreviewInfo::Missing { label };
    };

    if state.image_support_enabled {
        return match controller.preview_url(item) {
            Some(url) => PreviewInfo::Image {
                title: item.title.clone(),
                url,
            },
            None => PreviewInfo::TitleOnly {
                title: item.title.clone(),
            },
        };
    }

    PreviewInfo::Card {
        title: item.title.clone(),
        subtitle: item.subtitle.clone(),
        kind: item.kind.clone(),
        aspect_ratio: item.aspect_ratio(),
    }
}

fn compute_browse(state: &SelectionState, rows: usize, cols: usize) -> BrowseInfo {
    let search_bar = SearchBarInfo {
        query: state.search_text.clone(),
        count_label: state.count_label(),
    };

    if state.is_no_search_matches() {
        return BrowseInfo {
            search_bar,
            rows: vec![],
            no_matches: Some(MessageInfo {
                message: NO_MATCHES_MESSAGE.to_string(),
                subtitle: String::new(),
                tone: Tone::Info,
            }),
        };
    }

    let available_rows = rows.saturating_sub(BROWSE_CHROME_ROWS).max(1);
    let (start, end) = visible_window(state.cursor, state.items.len(), available_rows);

    let matcher = (!state.search_text.trim().is_empty()).then(SkimMatcherV2::default);
    let title_width = cols.saturating_sub(4) / 2;

    let rows = state.items[start..end]
        .iter()
        .enumerate()
        .map(|(offset, item)| {
            display_item(state, item, start + offset == state.cursor, title_width, matcher.as_ref())
        })
        .collect();

    BrowseInfo {
        search_bar,
        rows,
        no_matches: None,
    }
}

/// Window `[start, end)` of `len` rows keeping `cursor` near the middle.
fn visible_window(cursor: usize, len: usize, available: usize) -> (usize, usize) {
    let mut start = cursor.saturating_sub(available / 2);
    let end = (start + available).min(len);
    if end - start.min(end) < available && len >= available {
        start = end.saturating_sub(available);
    }
    (start.min(end), end)
}

fn display_item(
    state: &SelectionState,
    item: &CatalogItem,
    is_highlighted: bool,
    title_width: usize,
    matcher: Option<&SkimMatcherV2>,
) -> DisplayItem {
    let title = truncate(&item.title, title_width);
    let highlight_ranges = matcher.map_or_else(Vec::new, |m| {
        match_ranges(m, &title, &state.search_text)
    });

    DisplayItem {
        detail: item.subtitle.clone().unwrap_or_else(|| item.kind.clone()),
        is_highlighted,
        is_chosen: state.selected_id.as_ref() == Some(&item.id),
        highlight_ranges,
        title,
    }
}

/// Fuzzy-matched character indices of `query` in `text`, merged into ranges.
#[must_use]
pub fn match_ranges(matcher: &SkimMatcherV2, text: &str, query: &str) -> Vec<(usize, usize)> {
    let Some((_, indices)) = matcher.fuzzy_indices(text, query.trim()) else {
        return vec![];
    };

    let mut ranges: Vec<(usize, usize)> = Vec::new();
    for index in indices {
        match ranges.last_mut() {
            Some((_, end)) if *end == index => *end += 1,
            _ => ranges.push((index, index + 1)),
        }
    }
    ranges
}

/// Truncates to `width` characters, marking the cut with `...`.
fn truncate(text: &str, width: usize) -> String {
    if width < 4 || text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width - 3).collect();
    format!("{kept}...")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::ControllerOptions;
    use crate::catalog::{CatalogClient, CatalogPage, Capabilities};
    use crate::domain::ItemId;
    use crate::infrastructure::CacheBuster;

    fn controller_with(items: Vec<CatalogItem>, max_available: u64, image_support: bool) -> PickerController {
        let mut controller = PickerController::new(
            CatalogClient::new("https://x.test/wp-json"),
            ControllerOptions::default(),
            CacheBuster::new(5),
        );
        controller.apply_capabilities(Ok(Capabilities {
            image_support_enabled: image_support,
            origin_url: Some("https://x.test".to_string()),
            max_available,
        }));
        let total = items.len() as u64;
        controller.apply_catalog(1, Ok(CatalogPage { total_available: total, items }));
        controller
    }

    #[test]
    fn browse_shows_count_and_rows() {
        let controller = controller_with(vec![CatalogItem::new(1, "Sales"), CatalogItem::new(2, "Costs")], 5, true);
        let vm = compute_viewmodel(&controller, 24, 80);

        let Body::Browse(browse) = vm.body else {
            panic!("expected browse body");
        };
        assert_eq!(browse.search_bar.count_label, "2 of 2");
        assert_eq!(browse.rows.len(), 2);
        assert!(browse.rows[0].is_highlighted);
        assert!(!browse.rows[1].is_highlighted);
    }

    #[test]
    fn no_matches_message_replaces_rows() {
        let mut controller = controller_with(vec![], 5, true);
        controller.search("zz", 0);
        let vm = compute_viewmodel(&controller, 24, 80);

        let Body::Browse(browse) = vm.body else {
            panic!("expected browse body");
        };
        assert_eq!(browse.no_matches.map(|m| m.message).as_deref(), Some(NO_MATCHES_MESSAGE));
    }

    #[test]
    fn preview_variants() {
        let mut item = CatalogItem::new(1, "Sales");
        item.preview_url = Some("https://x.test/s.png".to_string());

        let mut controller = controller_with(vec![item.clone()], 1, true);
        controller.select(Some(ItemId::Int(1)));
        assert_eq!(
            compute_viewmodel(&controller, 24, 80).body,
            Body::Preview(PreviewInfo::Image {
                title: "Sales".to_string(),
                url: "https://x.test/s.png?random=5".to_string(),
            })
        );

        let mut controller = controller_with(vec![item], 1, false);
        controller.select(Some(ItemId::Int(1)));
        assert!(matches!(
            compute_viewmodel(&controller, 24, 80).body,
            Body::Preview(PreviewInfo::Card { .. })
        ));

        controller.select(Some(ItemId::Int(99)));
        assert_eq!(
            compute_viewmodel(&controller, 24, 80).body,
            Body::Preview(PreviewInfo::Missing {
                label: "Chart #99".to_string()
            })
        );
    }

    #[test]
    fn item_without_image_shows_only_its_title() {
        let mut item = CatalogItem::new(1, "Sales");
        item.subtitle = Some("Q1".to_string());

        let mut controller = controller_with(vec![item], 1, true);
        controller.select(Some(ItemId::Int(1)));
        assert_eq!(
            compute_viewmodel(&controller, 24, 80).body,
            Body::Preview(PreviewInfo::TitleOnly {
                title: "Sales".to_string()
            })
        );
    }

    #[test]
    fn denied_access_drops_retry_hint() {
        let mut controller = controller_with(vec![], 0, true);
        controller.deny_access();
        let vm = compute_viewmodel(&controller, 24, 80);

        let Body::Message(message) = vm.body else {
            panic!("expected message body");
        };
        assert_eq!(message.subtitle, ACCESS_DENIED_HINT);
        assert_eq!(vm.footer.keybindings, "Esc: close");
    }

    #[test]
    fn match_ranges_merge_adjacent_indices() {
        let matcher = SkimMatcherV2::default();
        assert_eq!(match_ranges(&matcher, "sales report", "sal"), vec![(0, 3)]);
        assert!(match_ranges(&matcher, "sales", "xyz").is_empty());
    }

    #[test]
    fn window_follows_cursor() {
        assert_eq!(visible_window(0, 3, 10), (0, 3));
        assert_eq!(visible_window(9, 10, 4), (6, 10));
        assert_eq!(visible_window(5, 10, 4), (3, 7));
    }

    #[test]
    fn truncate_marks_cut() {
        assert_eq!(truncate("abcdefgh", 6), "abc...");
        assert_eq!(truncate("abc", 6), "abc");
    }
}
