//! Worker thread message types for cross-thread communication.
//!
//! The protocol between the plugin thread and the worker thread that owns the
//! attribute store. Messages travel as JSON and carry the sender's trace
//! context so a selection and its write show up in one trace.

use crate::domain::ItemId;
use crate::storage::BlockAttributes;
use serde::{Deserialize, Serialize};

/// Trace and parent span ids of the plugin-side span that sent a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceContext {
    /// 32-digit hex trace id.
    pub trace_id: String,

    /// 16-digit hex id of the sending span.
    pub parent_span_id: String,
}

impl TraceContext {
    /// Captures the active span's OpenTelemetry ids.
    ///
    /// `None` outside an exported span, e.g. in tests without a subscriber.
    ///
    /// ```no_run
    /// use chart_picker::worker::TraceContext;
    ///
    /// let _span = tracing::debug_span!("select").entered();
    /// if let Some(context) = TraceContext::from_current() {
    ///     assert_eq!(context.trace_id.len(), 32);
    /// }
    /// ```
    #[must_use]
    pub fn from_current() -> Option<Self> {
        use opentelemetry::trace::TraceContextExt;
        use tracing_opentelemetry::OpenTelemetrySpanExt;

        let context = tracing::Span::current().context();
        let span = context.span();
        let ids = span.span_context();
        if !ids.is_valid() {
            return None;
        }

        let captured = Self {
            trace_id: format!("{:032x}", ids.trace_id()),
            parent_span_id: format!("{:016x}", ids.span_id()),
        };
        tracing::trace!(trace_id = %captured.trace_id, "trace context captured");
        Some(captured)
    }
}

/// Generates `WorkerMessage` constructors that stamp the current
/// [`TraceContext`] onto the variant.
macro_rules! worker_message_builders {
    (
        $(
            $builder_name:ident($variant:ident { $($field:ident: $ty:ty),* $(,)? })
        ),* $(,)?
    ) => {
        impl WorkerMessage {
            $(
                #[doc = concat!("Builds a `", stringify!($variant), "` carrying the current trace context.")]
                pub fn $builder_name($($field: $ty),*) -> Self {
                    Self::$variant {
                        $($field,)*
                        trace_context: TraceContext::from_current(),
                    }
                }
            )*
        }
    };
}

worker_message_builders! {
    load_attributes(LoadAttributes { block_id: String }),
    set_attributes(SetAttributes { block_id: String, chart_id: Option<ItemId> }),
}

/// Messages sent from the main thread to the worker thread.
///
/// All variants include an optional trace context so worker spans join the
/// plugin trace that caused them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerMessage {
    /// Read the stored attributes of a block.
    LoadAttributes {
        /// Host block the picker is mounted in.
        block_id: String,

        /// Trace context for linking spans across threads.
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Persist the chosen chart of a block; `None` clears it.
    SetAttributes {
        /// Host block the picker is mounted in.
        block_id: String,

        /// Selected chart id.
        chart_id: Option<ItemId>,

        /// Trace context for linking spans across threads.
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },
}

impl WorkerMessage {
    /// Trace context attached when the message was built.
    #[must_use]
    pub const fn trace_context(&self) -> Option<&TraceContext> {
        match self {
            Self::LoadAttributes { trace_context, .. } | Self::SetAttributes { trace_context, .. } => {
                trace_context.as_ref()
            }
        }
    }
}

/// Responses sent from the worker thread back to the main thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerResponse {
    /// Stored attributes of a block; `None` when the block has none yet.
    AttributesLoaded {
        block_id: String,
        attributes: Option<BlockAttributes>,
    },

    /// A `SetAttributes` write was persisted.
    AttributesSaved {
        block_id: String,
        attributes: BlockAttributes,
    },

    /// An error occurred during the worker operation.
    Error {
        /// Human-readable error message.
        message: String,
    },
}
