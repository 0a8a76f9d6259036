//! Zellij plugin wrapper and entry point.
//!
//! The thin layer between the chart picker library and the Zellij host. It
//! implements `ZellijPlugin` and `ZellijWorker`, translates host events into
//! library [`Event`]s and executes the returned [`Action`]s through the host
//! API. Nothing in here decides anything; the controller does.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────┐
//! │   Zellij Main Thread     │
//! │  ┌───────────────────┐   │
//! │  │  State (plugin)   │   │  ← controller, rendering
//! │  └───────────────────┘   │
//! │     │ web_request  │ IPC │
//! │     ▼              ▼     │
//! │  catalog     ┌───────────┐
//! │  service     │  worker   │  ← attribute store
//! │              └───────────┘
//! └──────────────────────────┘
//! ```
//!
//! # Event Mapping
//!
//! - `PermissionRequestResult(Granted)` → `Event::Initialize`
//! - `PermissionRequestResult(Denied)` → `Event::PermissionDenied`
//! - `WebRequestResult` → `Event::WebResponse` (routed by its context map)
//! - `Timer` → `Event::Tick`
//! - `CustomMessage` from the worker → `Event::WorkerResponse`
//! - `Key` → depends on the render state, see the keybindings below
//!
//! # Keybindings
//!
//! Global:
//! - `Esc`: Close (hide) the picker
//! - `Ctrl+o`: Open the create-chart page
//!
//! Browsing:
//! - Printable characters / `Backspace`: Edit the search text
//! - `Up`/`Down`, `Ctrl+p`/`Ctrl+n`: Move the cursor
//! - `Enter`: Select the highlighted chart
//!
//! Selected:
//! - `r`: Replace (clear the selection)
//! - `e`: Open the edit page of the selected chart
//! - `n`: Open the create-chart page
//! - `q`: Close
//!
//! Error: `r` retries. Empty catalog: `n` or `Enter` opens the create page.

#![allow(clippy::multiple_crate_versions)]

// Host imports only resolve inside the Zellij wasm runtime.
#[cfg(target_family = "wasm")]
use zellij_tile::prelude::*;

#[cfg(target_family = "wasm")]
register_plugin!(plugin::State);
#[cfg(target_family = "wasm")]
register_worker!(plugin::ChartPickerWorker, chart_picker_worker, CHART_PICKER_WORKER);

#[cfg(target_family = "wasm")]
mod plugin {
    use std::collections::BTreeMap;
    use zellij_tile::prelude::*;
    use zellij_tile::shim::{post_message_to, post_message_to_plugin};

    use chart_picker::worker::{init_worker_tracing, PickerWorker, WorkerMessage, WorkerResponse};
    use chart_picker::{Action, Config, Event, PickerController, Theme, ViewState};
    use serde::{Deserialize, Serialize};

    /// Worker name used for plugin ↔ worker messages.
    const WORKER_NAME: &str = "chart_picker";

    /// Worker thread entry point, wrapping the library's [`PickerWorker`].
    #[derive(Default, Serialize, Deserialize)]
    pub struct ChartPickerWorker {
        #[serde(skip)]
        inner: PickerWorker,
    }

    impl ZellijWorker<'_> for ChartPickerWorker {
        fn on_message(&mut self, message: String, payload: String) {
            init_worker_tracing();

            if let Some(payload) = self.inner.on_payload(&payload) {
                post_message_to_plugin(PluginMessage {
                    name: message,
                    payload,
                    worker_name: None,
                });
            }
        }
    }

    /// Plugin state wrapper.
    pub struct State {
        controller: PickerController,
        theme: Theme,
        worker_name: String,
    }

    impl Default for State {
        fn default() -> Self {
            let config = Config::default();
            Self {
                controller: chart_picker::initialize(&config),
                theme: Theme::default(),
                worker_name: WORKER_NAME.to_string(),
            }
        }
    }

    impl ZellijPlugin for State {
        /// Parses configuration, sets up tracing and the controller, then
        /// waits for permissions before issuing any request.
        ///
        /// Requests `WebAccess` for the catalog service and `RunCommands` for
        /// opening create/edit pages in the browser.
        fn load(&mut self, configuration: BTreeMap<String, String>) {
            let config = Config::from_zellij(&configuration);
            chart_picker::observability::init_tracing(&config);

            let span = tracing::debug_span!("plugin_load");
            let _guard = span.entered();

            tracing::debug!(api_base = %config.api_base, block_id = %config.block_id, "parsed configuration");
            self.controller = chart_picker::initialize(&config);
            self.theme = chart_picker::load_theme(&config);

            request_permission(&[PermissionType::WebAccess, PermissionType::RunCommands]);

            subscribe(&[
                EventType::Key,
                EventType::WebRequestResult,
                EventType::Timer,
                EventType::CustomMessage,
                EventType::PermissionRequestResult,
            ]);

            tracing::debug!("plugin load complete - waiting for permissions");
        }

        fn update(&mut self, event: zellij_tile::prelude::Event) -> bool {
            let event_name = Self::get_event_name(&event);
            let span = tracing::debug_span!("plugin_update_event", event_type = %event_name);
            let _guard = span.entered();

            let our_event = match event {
                zellij_tile::prelude::Event::Key(ref key) => match self.map_key_event(key) {
                    Some(event) => event,
                    None => return false,
                },
                zellij_tile::prelude::Event::WebRequestResult(status, _headers, body, context) => {
                    Event::WebResponse { status, body, context }
                }
                zellij_tile::prelude::Event::Timer(_) => Event::Tick,
                zellij_tile::prelude::Event::CustomMessage(message, payload) => {
                    match self.map_custom_message_event(&message, &payload) {
                        Some(event) => event,
                        None => return false,
                    }
                }
                zellij_tile::prelude::Event::PermissionRequestResult(status) => match status {
                    PermissionStatus::Granted => {
                        tracing::debug!("permissions granted - initializing picker");
                        Event::Initialize
                    }
                    PermissionStatus::Denied => Event::PermissionDenied,
                },
                _ => return false,
            };

            let now_ms = chrono::Utc::now().timestamp_millis();
            match self.controller.handle_event(&our_event, now_ms) {
                Ok((should_render, actions)) => {
                    for action in &actions {
                        self.execute_action(action);
                    }
                    should_render
                }
                Err(e) => {
                    tracing::debug!(error = %e, "error handling event");
                    false
                }
            }
        }

        fn render(&mut self, rows: usize, cols: usize) {
            chart_picker::ui::render(&self.controller, &self.theme, rows, cols);
        }
    }

    impl State {
        fn get_event_name(event: &zellij_tile::prelude::Event) -> String {
            match event {
                zellij_tile::prelude::Event::Key(key) => format!("Key({:?})", key.bare_key),
                zellij_tile::prelude::Event::WebRequestResult(status, ..) => format!("WebRequestResult({status})"),
                zellij_tile::prelude::Event::Timer(..) => "Timer".to_string(),
                zellij_tile::prelude::Event::CustomMessage(msg, _) => format!("CustomMessage({msg})"),
                zellij_tile::prelude::Event::PermissionRequestResult(..) => "PermissionRequestResult".to_string(),
                _ => "Other".to_string(),
            }
        }

        /// Maps keys to events for the current render state.
        ///
        /// Only the browsing state accepts search input, so letters are
        /// commands everywhere else.
        fn map_key_event(&self, key: &KeyWithModifier) -> Option<Event> {
            let view_state = self.controller.state().view_state();
            tracing::debug!(bare_key = ?key.bare_key, view_state = ?view_state, "key event");

            if key.has_modifiers(&[KeyModifier::Ctrl]) {
                return match key.bare_key {
                    BareKey::Char('o') => Some(Event::OpenNewChart),
                    BareKey::Char('n') if view_state.accepts_search_input() => Some(Event::CursorDown),
                    BareKey::Char('p') if view_state.accepts_search_input() => Some(Event::CursorUp),
                    _ => None,
                };
            }

            if key.bare_key == BareKey::Esc {
                return Some(Event::CloseFocus);
            }

            match view_state {
                ViewState::Browsing => match key.bare_key {
                    BareKey::Down => Some(Event::CursorDown),
                    BareKey::Up => Some(Event::CursorUp),
                    BareKey::Enter => Some(Event::SelectHighlighted),
                    BareKey::Backspace => Some(Event::Backspace),
                    BareKey::Char(c) => Some(Event::Char(c)),
                    _ => None,
                },
                ViewState::Selected => match key.bare_key {
                    BareKey::Char('r') => Some(Event::ClearSelection),
                    BareKey::Char('e') => Some(Event::OpenEditChart),
                    BareKey::Char('n') => Some(Event::OpenNewChart),
                    BareKey::Char('q') => Some(Event::CloseFocus),
                    _ => None,
                },
                ViewState::Error => match key.bare_key {
                    BareKey::Char('r') => Some(Event::Retry),
                    BareKey::Char('q') => Some(Event::CloseFocus),
                    _ => None,
                },
                ViewState::EmptyCatalog => match key.bare_key {
                    BareKey::Char('n') | BareKey::Enter => Some(Event::OpenNewChart),
                    BareKey::Char('q') => Some(Event::CloseFocus),
                    _ => None,
                },
                ViewState::Loading => match key.bare_key {
                    BareKey::Char('q') => Some(Event::CloseFocus),
                    _ => None,
                },
            }
        }

        fn map_custom_message_event(&self, message: &str, payload: &str) -> Option<Event> {
            if message != self.worker_name {
                tracing::debug!(message_name = %message, "ignoring custom message with unknown name");
                return None;
            }

            match serde_json::from_str::<WorkerResponse>(payload) {
                Ok(response) => Some(Event::WorkerResponse(response)),
                Err(e) => {
                    tracing::debug!(error = %e, "failed to deserialize worker response");
                    None
                }
            }
        }

        fn post_worker_message(&self, message: &WorkerMessage) {
            match serde_json::to_string(message) {
                Ok(payload) => {
                    tracing::debug!(payload_len = payload.len(), "posting message to worker");
                    post_message_to(PluginMessage {
                        worker_name: Some(self.worker_name.clone()),
                        name: self.worker_name.clone(),
                        payload,
                    });
                }
                Err(e) => {
                    tracing::debug!(error = %e, "failed to serialize worker message");
                }
            }
        }

        /// Translates library actions to Zellij API calls.
        #[tracing::instrument(level = "debug", skip(self))]
        fn execute_action(&self, action: &Action) {
            match action {
                Action::Fetch(request) => {
                    tracing::debug!(url = %request.url, kind = ?request.kind, "issuing web request");
                    web_request(
                        request.url.clone(),
                        HttpVerb::Get,
                        request.headers.clone(),
                        vec![],
                        request.context.clone(),
                    );
                }
                Action::ScheduleWake { delay_ms } => {
                    #[allow(clippy::cast_precision_loss)]
                    let secs = (*delay_ms).max(0) as f64 / 1000.0;
                    set_timeout(secs);
                }
                Action::PostToWorker(message) => self.post_worker_message(message),
                Action::OpenUrl { url } => {
                    tracing::debug!(url = %url, "opening url");
                    run_command(&["xdg-open", url.as_str()], BTreeMap::new());
                }
                Action::CloseFocus => {
                    tracing::debug!("closing plugin focus");
                    hide_self();
                }
            }
        }
    }
}

#[cfg(not(target_family = "wasm"))]
fn main() {
    eprintln!("chart-picker is a Zellij plugin; build it for wasm32-wasip1 and load the .wasm in Zellij");
}
