//! Chart Picker: a Zellij plugin for choosing one chart out of a remote catalog.
//!
//! The picker fetches a filtered catalog from a REST service, lets the user
//! narrow it down with a debounced search, and persists the chosen chart id
//! into a per-block attribute store:
//! - Capability probe plus filtered catalog listing over `web_request`
//! - 500 ms trailing-edge search debounce driven by plugin timers
//! - Five render states (error, loading, selected, empty catalog, browsing)
//! - Attribute persistence through a Zellij worker thread and a JSON file

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Zellij Plugin Shim (main.rs)                       │  ← Host calls only
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │
//! │  - PickerController: events in, actions out         │
//! │  - SelectionState + derived render state            │
//! │  - SearchDebouncer                                  │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ Catalog       │   │ Storage +     │   │ UI Layer      │
//! │ (catalog/)    │   │ Worker        │   │ (ui/)         │
//! │ - Requests    │   │ - JSON store  │   │ - View model  │
//! │ - Normalizing │   │ - IPC bridge  │   │ - Components  │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain, Infrastructure, Observability              │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! The library never calls the Zellij host API. Side effects leave the
//! controller as [`Action`]s and the plugin binary executes them, which keeps
//! everything here testable natively.
//!
//! # Configuration
//!
//! ```kdl
//! pane {
//!     plugin location="file:/path/to/chart-picker.wasm" {
//!         api_base "https://example.com/wp-json"
//!         block_id "post-42-block-3"
//!         debounce_ms "500"
//!         theme "catppuccin-latte"
//!         trace_level "debug"
//!     }
//! }
//! ```
//!
//! # Example
//!
//! ```rust
//! use chart_picker::{initialize, Action, Config, Event};
//!
//! let mut controller = initialize(&Config::default());
//! let (_, actions) = controller.handle_event(&Event::Initialize, 0)?;
//! assert_eq!(actions.iter().filter(|a| a.as_fetch().is_some()).count(), 2);
//! assert!(matches!(actions[2], Action::PostToWorker(_)));
//! # Ok::<(), chart_picker::PickerError>(())
//! ```

pub mod app;
pub mod catalog;
pub mod domain;
pub mod infrastructure;
pub mod storage;
pub mod worker;

pub mod ui;

pub mod observability;

pub use app::{Action, ControllerOptions, Event, PickerController, SelectionState, ViewState};
pub use domain::{CatalogItem, ItemId, PickerError, Result};
pub use ui::Theme;

use catalog::CatalogClient;
use infrastructure::CacheBuster;
use std::collections::BTreeMap;

/// Default REST root of the catalog service.
pub const DEFAULT_API_BASE: &str = "http://localhost/wp-json";

/// Plugin configuration parsed from Zellij's configuration system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// REST root the two catalog endpoints hang off.
    pub api_base: String,

    /// Identifies the host block whose attributes are read and written.
    pub block_id: String,

    /// Search debounce window in milliseconds.
    pub debounce_ms: i64,

    /// Sent verbatim as the `Authorization` header when set.
    pub auth_header: Option<String>,

    /// Built-in theme name. Ignored if `theme_file` is set.
    pub theme_name: Option<String>,

    /// Path to a custom TOML theme file; `~` is expanded.
    pub theme_file: Option<String>,

    /// `EnvFilter` directive for tracing. Default: `"info"`
    pub trace_level: Option<String>,

    /// Drop catalog responses older than the last applied one.
    pub discard_stale_responses: bool,

    /// Treat every catalog failure as an error, not only a missing route.
    pub strict_fetch_errors: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            block_id: "default".to_string(),
            debounce_ms: app::debounce::DEFAULT_WINDOW_MS,
            auth_header: None,
            theme_name: None,
            theme_file: None,
            trace_level: None,
            discard_stale_responses: true,
            strict_fetch_errors: true,
        }
    }
}

impl Config {
    /// Parses configuration from Zellij's configuration map.
    ///
    /// Unparseable or empty values fall back to their defaults. Booleans
    /// accept `true`/`false`, `yes`/`no`, `on`/`off` and `1`/`0`.
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use chart_picker::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("api_base".to_string(), "https://site.test/wp-json/".to_string());
    /// map.insert("debounce_ms".to_string(), "250".to_string());
    ///
    /// let config = Config::from_zellij(&map);
    /// assert_eq!(config.api_base, "https://site.test/wp-json");
    /// assert_eq!(config.debounce_ms, 250);
    /// ```
    #[must_use]
    pub fn from_zellij(config: &BTreeMap<String, String>) -> Self {
        let defaults = Self::default();
        let text = |key: &str| {
            config
                .get(key)
                .map(|value| value.trim())
                .filter(|value| !value.is_empty())
                .map(String::from)
        };
        let flag = |key: &str, default: bool| text(key).and_then(|value| parse_bool(&value)).unwrap_or(default);

        Self {
            api_base: text("api_base")
                .map_or(defaults.api_base, |base| base.trim_end_matches('/').to_string()),
            block_id: text("block_id").unwrap_or(defaults.block_id),
            debounce_ms: text("debounce_ms")
                .and_then(|value| value.parse::<i64>().ok())
                .filter(|ms| *ms >= 0)
                .unwrap_or(defaults.debounce_ms),
            auth_header: text("auth_header"),
            theme_name: text("theme"),
            theme_file: text("theme_file"),
            trace_level: text("trace_level"),
            discard_stale_responses: flag("discard_stale_responses", defaults.discard_stale_responses),
            strict_fetch_errors: flag("strict_fetch_errors", defaults.strict_fetch_errors),
        }
    }

    /// Controller switches derived from this configuration.
    #[must_use]
    pub fn controller_options(&self) -> ControllerOptions {
        ControllerOptions {
            block_id: self.block_id.clone(),
            debounce_ms: self.debounce_ms,
            discard_stale_responses: self.discard_stale_responses,
            strict_fetch_errors: self.strict_fetch_errors,
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

/// Creates the controller for one mounted picker.
///
/// A fresh cache-busting nonce is drawn here, so each mount gets its own.
#[must_use]
pub fn initialize(config: &Config) -> PickerController {
    tracing::debug!(api_base = %config.api_base, block_id = %config.block_id, "initializing chart picker");

    let mut client = CatalogClient::new(&config.api_base);
    if let Some(auth) = &config.auth_header {
        client = client.with_header("Authorization", auth);
    }

    PickerController::new(client, config.controller_options(), CacheBuster::random())
}

/// Loads the configured theme, falling back to the default on any failure.
#[must_use]
pub fn load_theme(config: &Config) -> Theme {
    config.theme_file.as_ref().map_or_else(
        || {
            config.theme_name.as_ref().map_or_else(Theme::default, |theme_name| {
                Theme::from_name(theme_name).unwrap_or_else(|| {
                    tracing::debug!(theme_name = %theme_name, "unknown theme, using default");
                    Theme::default()
                })
            })
        },
        |theme_file| {
            Theme::from_file(infrastructure::expand_tilde(theme_file)).unwrap_or_else(|e| {
                tracing::debug!(theme_file = %theme_file, error = %e, "failed to load theme from file, using default");
                Theme::default()
            })
        },
    )
}
