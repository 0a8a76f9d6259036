//! Render states of the picker.
//!
//! The picker has no stored mode: which screen to show is derived from
//! [`SelectionState`](super::SelectionState) fields every time, with a fixed
//! precedence. [`ViewState`] names the outcome so the renderer and the key
//! mapping agree on it.
//!
//! # Precedence
//!
//! ```text
//! Error > Loading > Selected > EmptyCatalog > Browsing
//! ```

/// Which screen the picker shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    /// The last catalog fetch failed; shown until a fetch succeeds.
    Error,

    /// The first catalog fetch has not settled yet.
    Loading,

    /// A chart id is selected; shows its preview or the title-only fallback.
    Selected,

    /// The unfiltered catalog is empty; prompts to create a chart.
    EmptyCatalog,

    /// Search box and result list.
    Browsing,
}

impl ViewState {
    /// Whether typed characters go to the search box in this state.
    #[must_use]
    pub const fn accepts_search_input(self) -> bool {
        matches!(self, Self::Browsing)
    }
}
