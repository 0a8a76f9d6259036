//! Tracing with file-based OTLP export.
//!
//! ```text
//! tracing macros → tracing-opentelemetry → SDK tracer → OtlpFileExporter → RotatingFile
//! ```
//!
//! Spans land in `chart-picker-otlp.json` inside the plugin data directory,
//! one OTLP JSON document per line, rotated at 5 MB with three numbered
//! backups.
//!
//! The filter level comes from the `trace_level` plugin option and falls back
//! to `info`.
//!
//! # Modules
//!
//! - [`init`]: Subscriber setup
//! - [`exporter`]: OTLP JSON span exporter and tracer provider
//! - [`rotation`]: Size-rotated trace file

pub mod exporter;
pub mod init;
pub mod rotation;

pub use init::{init_tracing, TRACE_FILE};
