//! Side effects produced by the controller.
//!
//! The controller never talks to Zellij directly. Every effect it wants (an
//! HTTP request, a timer, a storage write, opening a link) is returned as an
//! [`Action`] and executed by the plugin shim in order. Tests inspect the same
//! values instead of mocking the host.

use crate::catalog::CatalogRequest;
use crate::worker::WorkerMessage;

/// Commands executed by the plugin runtime after an event was handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Issue an HTTP GET; the response comes back as a web request result
    /// carrying the request's context map.
    Fetch(CatalogRequest),

    /// Deliver a timer wake-up after `delay_ms` milliseconds.
    ScheduleWake {
        delay_ms: i64,
    },

    /// Posts a message to the attribute store worker.
    PostToWorker(WorkerMessage),

    /// Open a create/edit page outside the plugin.
    OpenUrl {
        url: String,
    },

    /// Hides the plugin pane.
    CloseFocus,
}

impl Action {
    /// The catalog request carried by a [`Action::Fetch`], if any.
    #[must_use]
    pub const fn as_fetch(&self) -> Option<&CatalogRequest> {
        match self {
            Self::Fetch(request) => Some(request),
            _ => None,
        }
    }
}
