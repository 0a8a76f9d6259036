//! Selection state and the queries derived from it.
//!
//! [`SelectionState`] is the single source of truth for one picker instance:
//! search text, current result set, chosen id, load flags and capability
//! flags. It is owned by the [`PickerController`](super::PickerController);
//! the renderer only reads it. Everything the UI needs beyond the stored
//! fields (the chosen item, empty-catalog and no-match conditions, the render
//! state) is computed on demand so it can never drift from the fields.

use super::modes::ViewState;
use crate::catalog::{CatalogPage, Capabilities};
use crate::domain::{CatalogItem, ItemId};

/// Removes every character outside `[A-Za-z0-9\- ,]` from raw search input.
///
/// # Examples
///
/// ```
/// use chart_picker::app::sanitize_search;
///
/// assert_eq!(sanitize_search("Sales: Q1/Q2, 2024!"), "Sales Q1Q2, 2024");
/// assert_eq!(sanitize_search("héllo"), "hllo");
/// ```
#[must_use]
pub fn sanitize_search(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | ' ' | ','))
        .collect()
}

/// Mutable state of one picker instance.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionState {
    /// Sanitized search text, shown in the search box as-is.
    pub search_text: String,

    /// Current result set for `search_text`, in server order.
    pub items: Vec<CatalogItem>,

    /// The server's count for the current search.
    pub total_available: u64,

    /// Size of the unfiltered catalog, from the capability probe.
    pub max_available: u64,

    /// The chosen chart, mirrored into the host's attributes.
    pub selected_id: Option<ItemId>,

    /// Whether a catalog fetch has settled (successfully or not).
    pub loaded: bool,

    /// Whether the most recent catalog fetch failed.
    pub load_error: bool,

    /// The host refused web access, so no fetch can ever succeed.
    pub access_denied: bool,

    /// Capability flag: preview images available.
    pub image_support_enabled: bool,

    /// Base URL for create/edit links.
    pub origin_url: Option<String>,

    /// Highlighted row in the result list.
    pub cursor: usize,

    /// Set once `initialize` has issued the mount fetches.
    pub initialized: bool,

    /// Token of the most recently applied catalog response.
    pub applied_token: u64,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self {
            search_text: String::new(),
            items: Vec::new(),
            total_available: 0,
            max_available: 0,
            selected_id: None,
            loaded: false,
            load_error: false,
            access_denied: false,
            image_support_enabled: true,
            origin_url: None,
            cursor: 0,
            initialized: false,
            applied_token: 0,
        }
    }
}

impl SelectionState {
    /// Creates the empty state a freshly mounted picker starts with.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The item in the current result set whose id equals `selected_id`.
    ///
    /// `None` when nothing is selected or when the selected chart is not part
    /// of the current results; the selection itself is kept by id either way.
    #[must_use]
    pub fn selected_item(&self) -> Option<&CatalogItem> {
        let selected = self.selected_id.as_ref()?;
        self.items.iter().find(|item| &item.id == selected)
    }

    /// The item under the list cursor.
    #[must_use]
    pub fn highlighted_item(&self) -> Option<&CatalogItem> {
        self.items.get(self.cursor)
    }

    /// `true` when the unfiltered catalog has no charts at all.
    #[must_use]
    pub const fn is_empty_catalog(&self) -> bool {
        self.max_available == 0
    }

    /// `true` when a search of two or more characters matched nothing in a
    /// non-empty catalog.
    #[must_use]
    pub fn is_no_search_matches(&self) -> bool {
        self.items.is_empty() && self.search_text.len() > 1 && self.max_available > 0
    }

    /// Whether a chart id is currently chosen.
    #[must_use]
    pub fn has_selection(&self) -> bool {
        self.selected_id.as_ref().is_some_and(|id| !id.is_blank())
    }

    /// Render state derived from the fields, in precedence order.
    ///
    /// # Example
    ///
    /// ```
    /// use chart_picker::app::{SelectionState, ViewState};
    ///
    /// let mut state = SelectionState::new();
    /// assert_eq!(state.view_state(), ViewState::Loading);
    ///
    /// state.load_error = true;
    /// assert_eq!(state.view_state(), ViewState::Error);
    /// ```
    #[must_use]
    pub fn view_state(&self) -> ViewState {
        if self.load_error {
            ViewState::Error
        } else if !self.loaded {
            ViewState::Loading
        } else if self.has_selection() {
            ViewState::Selected
        } else if self.is_empty_catalog() {
            ViewState::EmptyCatalog
        } else {
            ViewState::Browsing
        }
    }

    /// Result count line shown next to the search box, e.g. `"2 of 5"`.
    #[must_use]
    pub fn count_label(&self) -> String {
        format!("{} of {}", self.items.len(), self.total_available)
    }

    /// Applies the capability probe result.
    pub fn apply_capabilities(&mut self, capabilities: Capabilities) {
        self.image_support_enabled = capabilities.image_support_enabled;
        self.origin_url = capabilities.origin_url;
        self.max_available = capabilities.max_available;
    }

    /// Replaces the result set with a fetched page and marks the load settled.
    pub fn apply_page(&mut self, page: CatalogPage) {
        self.items = page.items;
        self.total_available = page.total_available;
        self.loaded = true;
        self.clamp_cursor();
    }

    /// Moves the list cursor down one row, wrapping to the top.
    pub fn move_cursor_down(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.cursor = (self.cursor + 1) % self.items.len();
    }

    /// Moves the list cursor up one row, wrapping to the bottom.
    pub fn move_cursor_up(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.cursor = self.cursor.checked_sub(1).unwrap_or(self.items.len() - 1);
    }

    fn clamp_cursor(&mut self) {
        self.cursor = self.cursor.min(self.items.len().saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded_state(items: Vec<CatalogItem>, max_available: u64) -> SelectionState {
        let mut state = SelectionState::new();
        state.max_available = max_available;
        state.apply_page(CatalogPage {
            total_available: items.len() as u64,
            items,
        });
        state
    }

    #[test]
    fn sanitize_keeps_only_allowed_characters_and_is_idempotent() {
        let inputs = ["", "abc-DEF 123,", "a_b*c(d)", "tab\tnew\nline", "ümlaut ß", "<script>"];
        for input in inputs {
            let once = sanitize_search(input);
            assert!(once
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == ' ' || c == ','));
            assert_eq!(sanitize_search(&once), once);
        }
        assert_eq!(sanitize_search("a_b*c(d)"), "abcd");
    }

    #[test]
    fn empty_catalog_depends_only_on_max_available() {
        let mut state = loaded_state(vec![], 0);
        for search in ["", "x", "some search"] {
            state.search_text = search.to_string();
            assert!(state.is_empty_catalog());
            assert_eq!(state.view_state(), ViewState::EmptyCatalog);
        }

        state.max_available = 3;
        assert!(!state.is_empty_catalog());
    }

    #[test]
    fn no_search_matches_requires_two_characters_and_non_empty_catalog() {
        let mut state = loaded_state(vec![], 4);
        state.search_text = "a".to_string();
        assert!(!state.is_no_search_matches());

        state.search_text = "ab".to_string();
        assert!(state.is_no_search_matches());

        state.max_available = 0;
        assert!(!state.is_no_search_matches());

        let mut state = loaded_state(vec![CatalogItem::new(1, "ab")], 4);
        state.search_text = "ab".to_string();
        assert!(!state.is_no_search_matches());
    }

    #[test]
    fn error_wins_over_loading_and_selected() {
        let mut state = SelectionState::new();
        state.load_error = true;
        state.loaded = false;
        state.selected_id = Some(ItemId::Int(1));
        assert_eq!(state.view_state(), ViewState::Error);
    }

    #[test]
    fn selected_wins_over_empty_catalog() {
        let mut state = loaded_state(vec![], 0);
        state.selected_id = Some(ItemId::Int(9));
        assert_eq!(state.view_state(), ViewState::Selected);
        assert_eq!(state.selected_item(), None);

        state.selected_id = Some(ItemId::from(""));
        assert_eq!(state.view_state(), ViewState::EmptyCatalog);
    }

    #[test]
    fn selected_item_resolves_by_id() {
        let mut state = loaded_state(vec![CatalogItem::new(1, "A"), CatalogItem::new(2, "B")], 2);
        state.selected_id = Some(ItemId::Int(2));
        assert_eq!(state.selected_item().map(|item| item.title.as_str()), Some("B"));
    }

    #[test]
    fn cursor_wraps_and_clamps() {
        let mut state = loaded_state(
            vec![CatalogItem::new(1, "A"), CatalogItem::new(2, "B"), CatalogItem::new(3, "C")],
            3,
        );
        state.move_cursor_up();
        assert_eq!(state.cursor, 2);
        state.move_cursor_down();
        assert_eq!(state.cursor, 0);

        state.cursor = 2;
        state.apply_page(CatalogPage {
            total_available: 1,
            items: vec![CatalogItem::new(1, "A")],
        });
        assert_eq!(state.cursor, 0);
    }
}
