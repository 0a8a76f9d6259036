//! Background worker thread owning the attribute store.
//!
//! # Architecture
//!
//! - `messages`: Request/response protocol types with trace context propagation
//! - `handler`: Message processing against the storage backend

pub mod handler;
pub mod messages;

pub use handler::{init_worker_tracing, PickerWorker, ATTRIBUTES_FILE};
pub use messages::{TraceContext, WorkerMessage, WorkerResponse};
