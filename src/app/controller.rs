//! Event processing for the chart picker.
//!
//! [`PickerController`] owns the [`SelectionState`], the search debouncer and
//! the catalog client. Everything that happens to the picker arrives as an
//! [`Event`]; the controller updates the state and returns the side effects
//! to run as [`Action`]s.
//!
//! # Event Types
//!
//! - **Input**: `Char`, `Backspace`, `Search`, cursor movement, selection
//! - **Navigation**: `OpenNewChart`, `OpenEditChart`, `CloseFocus`
//! - **Timers**: `Tick` closes the debounce window
//! - **Responses**: `WebResponse` (raw) or the parsed `CapabilitiesFetched` /
//!   `CatalogFetched`, plus `WorkerResponse` from the attribute store
//!
//! # Stale responses
//!
//! Every catalog request carries a monotonic token. With
//! [`ControllerOptions::discard_stale_responses`] set, a response older than
//! the last applied one is dropped, so a slow early search can never
//! overwrite the results of a later one.

use super::actions::Action;
use super::debounce::{SearchDebouncer, Wake, DEFAULT_WINDOW_MS};
use super::modes::ViewState;
use super::state::{sanitize_search, SelectionState};
use crate::catalog::{CatalogClient, CatalogPage, Capabilities, FetchError, RequestKind};
use crate::domain::error::Result;
use crate::domain::{CatalogItem, ItemId};
use crate::infrastructure::CacheBuster;
use crate::worker::{WorkerMessage, WorkerResponse};
use std::collections::BTreeMap;

/// Behavior switches of one controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerOptions {
    /// Host block whose attributes this picker reads and writes.
    pub block_id: String,

    /// Debounce window for search-triggered fetches.
    pub debounce_ms: i64,

    /// Drop catalog responses older than the last applied one.
    pub discard_stale_responses: bool,

    /// Surface every catalog failure as an error, not only a missing route.
    pub strict_fetch_errors: bool,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            block_id: "default".to_string(),
            debounce_ms: DEFAULT_WINDOW_MS,
            discard_stale_responses: true,
            strict_fetch_errors: true,
        }
    }
}

/// Events delivered to the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Issues the mount fetches; only the first one has an effect.
    Initialize,
    /// Appends a character to the search text.
    Char(char),
    /// Removes the last character of the search text.
    Backspace,
    /// Replaces the search text.
    Search(String),
    /// Moves the list cursor down (wraps to top).
    CursorDown,
    /// Moves the list cursor up (wraps to bottom).
    CursorUp,
    /// Selects the item under the cursor.
    SelectHighlighted,
    /// Selects an id; `None` or a blank id clears.
    Select(Option<ItemId>),
    /// Clears the selection ("Replace").
    ClearSelection,
    /// Re-fetches the current search after a failure.
    Retry,
    /// The host refused the permissions the picker needs.
    PermissionDenied,
    /// Opens the create-chart page.
    OpenNewChart,
    /// Opens the edit page of the selected chart.
    OpenEditChart,
    /// Hides the plugin.
    CloseFocus,
    /// A scheduled wake-up fired.
    Tick,
    /// Raw HTTP result, routed through its context map.
    WebResponse {
        status: u16,
        body: Vec<u8>,
        context: BTreeMap<String, String>,
    },
    /// Parsed capability probe outcome.
    CapabilitiesFetched(std::result::Result<Capabilities, FetchError>),
    /// Parsed catalog outcome for the request issued with `token`.
    CatalogFetched {
        token: u64,
        result: std::result::Result<CatalogPage, FetchError>,
    },
    /// Reply from the attribute store worker.
    WorkerResponse(WorkerResponse),
}

/// Orchestrates fetching, searching and selecting for one mounted picker.
#[derive(Debug, Clone)]
pub struct PickerController {
    state: SelectionState,
    debouncer: SearchDebouncer,
    client: CatalogClient,
    options: ControllerOptions,
    cache_buster: CacheBuster,
    next_token: u64,
    restore_pending: bool,
}

impl PickerController {
    /// Creates a controller with an empty state.
    ///
    /// ```
    /// use chart_picker::app::{ControllerOptions, PickerController, ViewState};
    /// use chart_picker::catalog::CatalogClient;
    /// use chart_picker::infrastructure::CacheBuster;
    ///
    /// let controller = PickerController::new(
    ///     CatalogClient::new("https://x.test/wp-json"),
    ///     ControllerOptions::default(),
    ///     CacheBuster::new(1),
    /// );
    /// assert_eq!(controller.state().view_state(), ViewState::Loading);
    /// ```
    #[must_use]
    pub fn new(client: CatalogClient, options: ControllerOptions, cache_buster: CacheBuster) -> Self {
        Self {
            state: SelectionState::new(),
            debouncer: SearchDebouncer::new(options.debounce_ms),
            client,
            options,
            cache_buster,
            next_token: 0,
            restore_pending: true,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &SelectionState {
        &self.state
    }

    /// Processes an event, returning whether to re-render and the actions to
    /// run.
    ///
    /// # Errors
    ///
    /// Currently infallible; the `Result` lets the plugin shim treat every
    /// handler the same way.
    pub fn handle_event(&mut self, event: &Event, now_ms: i64) -> Result<(bool, Vec<Action>)> {
        let _span = tracing::debug_span!("handle_event", event_type = event_name(event)).entered();

        let outcome = match event {
            Event::Initialize => {
                let actions = self.initialize();
                (!actions.is_empty(), actions)
            }
            Event::Char(c) => {
                let mut text = self.state.search_text.clone();
                text.push(*c);
                (true, self.search(&text, now_ms))
            }
            Event::Backspace => {
                let mut text = self.state.search_text.clone();
                if text.pop().is_none() {
                    return Ok((false, vec![]));
                }
                (true, self.search(&text, now_ms))
            }
            Event::Search(text) => (true, self.search(text, now_ms)),
            Event::CursorDown => {
                self.state.move_cursor_down();
                (true, vec![])
            }
            Event::CursorUp => {
                self.state.move_cursor_up();
                (true, vec![])
            }
            Event::SelectHighlighted => match self.state.highlighted_item().map(|item| item.id.clone()) {
                Some(id) => (true, self.select(Some(id))),
                None => {
                    tracing::debug!("no item highlighted");
                    (false, vec![])
                }
            },
            Event::Select(id) => (true, self.select(id.clone())),
            Event::ClearSelection => (true, self.select(None)),
            Event::Retry => {
                let actions = self.retry();
                (!actions.is_empty(), actions)
            }
            Event::PermissionDenied => {
                self.deny_access();
                (true, vec![])
            }
            Event::OpenNewChart => (false, self.open(self.new_chart_link())),
            Event::OpenEditChart => (false, self.open(self.edit_chart_link())),
            Event::CloseFocus => (false, vec![Action::CloseFocus]),
            Event::Tick => {
                let actions = self.wake(now_ms);
                let fired = actions.iter().any(|a| a.as_fetch().is_some());
                (fired, actions)
            }
            Event::WebResponse { status, body, context } => {
                (self.apply_web_response(*status, body, context), vec![])
            }
            Event::CapabilitiesFetched(result) => (self.apply_capabilities(result.clone()), vec![]),
            Event::CatalogFetched { token, result } => (self.apply_catalog(*token, result.clone()), vec![]),
            Event::WorkerResponse(response) => (self.apply_worker_response(response), vec![]),
        };

        tracing::debug!(
            should_render = outcome.0,
            action_count = outcome.1.len(),
            view_state = ?self.state.view_state(),
            "event handled"
        );
        Ok(outcome)
    }

    /// Issues the capability probe, the unfiltered catalog fetch and the
    /// attribute load. A second call returns no actions.
    pub fn initialize(&mut self) -> Vec<Action> {
        if self.state.initialized {
            tracing::debug!("already initialized");
            return vec![];
        }
        self.state.initialized = true;

        let token = self.issue_token();
        tracing::debug!(token = token, block_id = %self.options.block_id, "initializing picker");

        vec![
            Action::Fetch(self.client.capabilities_request()),
            Action::Fetch(self.client.catalog_request("", token)),
            Action::PostToWorker(WorkerMessage::load_attributes(self.options.block_id.clone())),
        ]
    }

    /// Stores the sanitized search text and restarts the debounce window.
    pub fn search(&mut self, raw: &str, now_ms: i64) -> Vec<Action> {
        let text = sanitize_search(raw);
        self.state.search_text.clone_from(&text);
        self.state.cursor = 0;

        let delay_ms = self.debouncer.trigger(text, now_ms);
        vec![Action::ScheduleWake { delay_ms }]
    }

    /// Settles the picker on the error screen for good. Mount fetches are
    /// never issued afterwards.
    pub fn deny_access(&mut self) {
        tracing::warn!("web access denied - catalog cannot be fetched");
        self.debouncer.cancel();
        self.state.initialized = true;
        self.state.access_denied = true;
        self.state.loaded = true;
        self.state.load_error = true;
    }

    /// Handles a timer wake-up: fires the pending search or re-arms.
    pub fn wake(&mut self, now_ms: i64) -> Vec<Action> {
        match self.debouncer.wake(now_ms) {
            Wake::Fire(text) => {
                self.state.load_error = false;
                let token = self.issue_token();
                tracing::debug!(search_text = %text, token = token, "debounced search fired");
                vec![Action::Fetch(self.client.catalog_request(&text, token))]
            }
            Wake::Rearm { delay_ms } => vec![Action::ScheduleWake { delay_ms }],
            Wake::Idle => vec![],
        }
    }

    /// Sets or clears the selected chart and persists it.
    ///
    /// Blank ids clear. The fetched items are left alone either way.
    pub fn select(&mut self, id: Option<ItemId>) -> Vec<Action> {
        let id = id.filter(|id| !id.is_blank());
        tracing::debug!(chart_id = ?id, "selection changed");

        self.restore_pending = false;
        self.state.selected_id.clone_from(&id);

        vec![Action::PostToWorker(WorkerMessage::set_attributes(
            self.options.block_id.clone(),
            id,
        ))]
    }

    /// Re-fetches the current search text. Only available in the error state,
    /// and never once web access was denied.
    pub fn retry(&mut self) -> Vec<Action> {
        if self.state.view_state() != ViewState::Error || self.state.access_denied {
            return vec![];
        }

        self.debouncer.cancel();
        self.state.load_error = false;
        let token = self.issue_token();
        tracing::debug!(search_text = %self.state.search_text, token = token, "retrying fetch");
        vec![Action::Fetch(self.client.catalog_request(&self.state.search_text, token))]
    }

    /// Link to the create-chart page, once the service origin is known.
    #[must_use]
    pub fn new_chart_link(&self) -> Option<String> {
        let origin = self.state.origin_url.as_deref()?;
        Some(format!("{origin}/create?type=chart"))
    }

    /// Link to the edit page of the selected chart.
    #[must_use]
    pub fn edit_chart_link(&self) -> Option<String> {
        let origin = self.state.origin_url.as_deref()?;
        let id = self.state.selected_id.as_ref()?;
        Some(format!("{origin}/edit?id={id}"))
    }

    /// Cache-busted preview URL of an item, `None` when it has no image.
    #[must_use]
    pub fn preview_url(&self, item: &CatalogItem) -> Option<String> {
        item.preview_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .map(|url| self.cache_buster.apply(url))
    }

    /// Applies the capability probe outcome. Failures keep the defaults.
    pub fn apply_capabilities(&mut self, result: std::result::Result<Capabilities, FetchError>) -> bool {
        match result {
            Ok(capabilities) => {
                tracing::debug!(capabilities = ?capabilities, "capabilities loaded");
                self.state.apply_capabilities(capabilities);
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "capability probe failed, keeping defaults");
                false
            }
        }
    }

    /// Applies a catalog outcome for the request issued with `token`.
    pub fn apply_catalog(&mut self, token: u64, result: std::result::Result<CatalogPage, FetchError>) -> bool {
        if self.options.discard_stale_responses && token < self.state.applied_token {
            tracing::debug!(token = token, applied = self.state.applied_token, "discarding stale catalog response");
            return false;
        }

        match result {
            Ok(page) => {
                tracing::debug!(token = token, item_count = page.items.len(), "catalog applied");
                self.state.apply_page(page);
                self.state.load_error = false;
            }
            Err(e) if e.is_route_not_found() || self.options.strict_fetch_errors => {
                tracing::warn!(token = token, error = %e, "catalog fetch failed");
                self.state.load_error = true;
                self.state.loaded = true;
            }
            Err(e) => {
                tracing::warn!(token = token, error = %e, "catalog fetch failed, ignoring");
                return false;
            }
        }

        self.state.applied_token = token;
        true
    }

    /// Routes a raw HTTP result to the matching parser using its context map.
    pub fn apply_web_response(&mut self, status: u16, body: &[u8], context: &BTreeMap<String, String>) -> bool {
        match RequestKind::from_context(context) {
            Some(RequestKind::Capabilities) => {
                let result = self.client.parse_capabilities(status, body);
                self.apply_capabilities(result)
            }
            Some(RequestKind::Catalog { token }) => {
                let path = CatalogClient::context_path(context);
                let result = self.client.parse_catalog(status, body, path);
                self.apply_catalog(token, result)
            }
            None => {
                tracing::debug!(status = status, "ignoring web response without picker context");
                false
            }
        }
    }

    /// Applies a reply from the attribute store.
    ///
    /// Stored attributes restore the selection once per mount, unless the
    /// user already selected or cleared something.
    pub fn apply_worker_response(&mut self, response: &WorkerResponse) -> bool {
        match response {
            WorkerResponse::AttributesLoaded { block_id, attributes } => {
                if block_id != &self.options.block_id || !self.restore_pending {
                    tracing::debug!(block_id = %block_id, "ignoring attributes");
                    return false;
                }
                self.restore_pending = false;

                let stored = attributes
                    .as_ref()
                    .and_then(|a| a.chart_id.clone())
                    .filter(|id| !id.is_blank());
                tracing::debug!(chart_id = ?stored, "restoring stored selection");

                match stored {
                    Some(id) => {
                        self.state.selected_id = Some(id);
                        true
                    }
                    None => false,
                }
            }
            WorkerResponse::AttributesSaved { block_id, attributes } => {
                tracing::debug!(block_id = %block_id, chart_id = ?attributes.chart_id, "attributes persisted");
                false
            }
            WorkerResponse::Error { message } => {
                tracing::warn!(error = %message, "attribute store error");
                false
            }
        }
    }

    fn open(&self, link: Option<String>) -> Vec<Action> {
        match link {
            Some(url) => vec![Action::OpenUrl { url }],
            None => {
                tracing::debug!(origin = ?self.state.origin_url, "link not available yet");
                vec![]
            }
        }
    }

    fn issue_token(&mut self) -> u64 {
        self.next_token += 1;
        self.next_token
    }
}

const fn event_name(event: &Event) -> &'static str {
    match event {
        Event::Initialize => "Initialize",
        Event::Char(_) => "Char",
        Event::Backspace => "Backspace",
        Event::Search(_) => "Search",
        Event::CursorDown => "CursorDown",
        Event::CursorUp => "CursorUp",
        Event::SelectHighlighted => "SelectHighlighted",
        Event::Select(_) => "Select",
        Event::ClearSelection => "ClearSelection",
        Event::Retry => "Retry",
        Event::PermissionDenied => "PermissionDenied",
        Event::OpenNewChart => "OpenNewChart",
        Event::OpenEditChart => "OpenEditChart",
        Event::CloseFocus => "CloseFocus",
        Event::Tick => "Tick",
        Event::WebResponse { .. } => "WebResponse",
        Event::CapabilitiesFetched(_) => "CapabilitiesFetched",
        Event::CatalogFetched { .. } => "CatalogFetched",
        Event::WorkerResponse(_) => "WorkerResponse",
    }
}
