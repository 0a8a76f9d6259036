//! Worker thread logic for the attribute store.
//!
//! Storage I/O runs on a Zellij worker thread so the picker never blocks its
//! render loop on the filesystem. This module holds everything the worker does
//! except the final `post_message_to_plugin` call, which the plugin binary
//! makes with the payload returned by [`PickerWorker::on_payload`].

use crate::domain::error::{PickerError, Result};
use crate::domain::ItemId;
use crate::infrastructure::paths;
use crate::storage::{BlockAttributes, JsonStorage, Storage};
use crate::worker::{WorkerMessage, WorkerResponse};

/// File name of the attribute store inside the data directory.
pub const ATTRIBUTES_FILE: &str = "attributes.json";

/// Worker thread state.
///
/// The storage backend is opened lazily on the first message, since the
/// worker is constructed through `Default` before any host paths are usable.
#[derive(Default)]
pub struct PickerWorker {
    storage: Option<Box<dyn Storage>>,
}

impl std::fmt::Debug for PickerWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PickerWorker")
            .field("storage_open", &self.storage.is_some())
            .finish()
    }
}

impl PickerWorker {
    /// Creates a worker backed by the JSON store in the plugin data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend cannot be initialized.
    pub fn open_default() -> Result<Self> {
        let path = paths::get_data_dir().join(ATTRIBUTES_FILE);
        Ok(Self::with_storage(Box::new(JsonStorage::new(path)?)))
    }

    /// Creates a worker over an already opened backend.
    #[must_use]
    pub fn with_storage(storage: Box<dyn Storage>) -> Self {
        Self { storage: Some(storage) }
    }

    fn get_storage(&mut self) -> Result<&mut Box<dyn Storage>> {
        self.storage
            .as_mut()
            .ok_or_else(|| PickerError::Worker("Storage not initialized".to_string()))
    }

    /// Standardizes error handling and success logging across storage calls.
    fn handle_db_result<T, F>(operation: &str, result: Result<T>, on_success: F) -> WorkerResponse
    where
        F: FnOnce(T) -> WorkerResponse,
    {
        match result {
            Ok(value) => {
                tracing::debug!(operation = operation, "storage operation successful");
                on_success(value)
            }
            Err(e) => {
                tracing::warn!(operation = operation, error = %e, "storage operation failed");
                WorkerResponse::Error {
                    message: format!("{operation}: {e}"),
                }
            }
        }
    }

    fn handle_load_attributes(&mut self, block_id: String) -> WorkerResponse {
        Self::handle_db_result(
            "load attributes",
            self.get_storage().and_then(|storage| storage.get_attributes(&block_id)),
            |attributes| WorkerResponse::AttributesLoaded { block_id, attributes },
        )
    }

    fn handle_set_attributes(&mut self, block_id: String, chart_id: Option<ItemId>) -> WorkerResponse {
        let attributes = BlockAttributes::new(chart_id);

        Self::handle_db_result(
            "set attributes",
            self.get_storage()
                .and_then(|storage| storage.set_attributes(&block_id, &attributes)),
            |()| {
                tracing::debug!(block_id = %block_id, chart_id = ?attributes.chart_id, "attributes saved");
                WorkerResponse::AttributesSaved { block_id, attributes }
            },
        )
    }

    /// Reconstructs the sender's OpenTelemetry context on this thread.
    ///
    /// The returned guard must be held for the duration of the operation.
    fn attach_parent_trace_context(message: &WorkerMessage) -> Option<opentelemetry::ContextGuard> {
        use opentelemetry::trace::{SpanContext, SpanId, TraceContextExt, TraceFlags, TraceId, TraceState};

        let trace_context = message.trace_context()?;

        let trace_id = TraceId::from_hex(&trace_context.trace_id).ok()?;
        let span_id = SpanId::from_hex(&trace_context.parent_span_id).ok()?;

        let span_context = SpanContext::new(
            trace_id,
            span_id,
            TraceFlags::SAMPLED,
            true,
            TraceState::default(),
        );

        let otel_context = opentelemetry::Context::current().with_remote_span_context(span_context);

        Some(otel_context.attach())
    }

    /// Processes a worker message and returns the response for the plugin.
    pub fn handle_message(&mut self, message: WorkerMessage) -> WorkerResponse {
        let _context_guard = Self::attach_parent_trace_context(&message);

        let span = tracing::debug_span!("worker_handle_message", message_type = ?message);
        let _guard = span.entered();

        match message {
            WorkerMessage::LoadAttributes { block_id, .. } => self.handle_load_attributes(block_id),
            WorkerMessage::SetAttributes { block_id, chart_id, .. } => {
                self.handle_set_attributes(block_id, chart_id)
            }
        }
    }

    /// Handles one raw message payload and returns the serialized response.
    ///
    /// Opens the storage backend on first use. Returns `None` when the payload
    /// is not a [`WorkerMessage`] or the response cannot be serialized; both
    /// are logged.
    pub fn on_payload(&mut self, payload: &str) -> Option<String> {
        let response = if self.storage.is_none() {
            match Self::open_default() {
                Ok(worker) => {
                    self.storage = worker.storage;
                    None
                }
                Err(e) => {
                    tracing::warn!(error = %e, "failed to initialize storage");
                    Some(WorkerResponse::Error {
                        message: format!("Failed to initialize storage: {e}"),
                    })
                }
            }
        } else {
            None
        };

        let response = match response {
            Some(error) => error,
            None => match serde_json::from_str::<WorkerMessage>(payload) {
                Ok(message) => self.handle_message(message),
                Err(e) => {
                    tracing::debug!(error = %e, "failed to deserialize worker message");
                    return None;
                }
            },
        };

        serde_json::to_string(&response)
            .map_err(|e| tracing::debug!(error = %e, "failed to serialize worker response"))
            .ok()
    }
}

/// Sets up the same tracing configuration as the plugin thread, so logs from
/// both threads land in the same file. Only the first call per worker thread
/// has an effect.
pub fn init_worker_tracing() {
    if !WORKER_TRACING_INITIALIZED.swap(true, std::sync::atomic::Ordering::Relaxed) {
        crate::observability::init_tracing(&crate::Config::default());
    }
}

static WORKER_TRACING_INITIALIZED: std::sync::atomic::AtomicBool =
    std::sync::atomic::AtomicBool::new(false);
