//! Error types for the chart picker plugin.
//!
//! This module defines the centralized error type [`PickerError`] and a type alias
//! [`Result`] for the ambient concerns of the plugin: attribute storage, file I/O,
//! theme loading, worker communication and configuration. Failures of the two
//! remote catalog reads are modelled separately by
//! [`FetchError`](crate::catalog::FetchError), because the controller has to
//! branch on them rather than propagate them.

use thiserror::Error;

/// The main error type for chart picker operations.
///
/// Most variants carry a human-readable description. I/O errors convert
/// automatically through `#[from]`.
///
/// # Examples
///
/// ```
/// use chart_picker::PickerError;
///
/// fn validate_block_id(id: &str) -> Result<(), PickerError> {
///     if id.is_empty() {
///         return Err(PickerError::Config("block_id must not be empty".to_string()));
///     }
///     Ok(())
/// }
///
/// assert!(validate_block_id("").is_err());
/// ```
#[derive(Debug, Error)]
pub enum PickerError {
    /// Reading or writing the attribute store failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Theme parsing or loading failed.
    #[error("Theme error: {0}")]
    Theme(String),

    /// Communication with the background worker failed.
    ///
    /// Raised when the worker is asked to do something before its store is
    /// initialized, or when a message cannot be encoded.
    #[error("Worker communication error: {0}")]
    Worker(String),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// A specialized `Result` type for chart picker operations.
pub type Result<T> = std::result::Result<T, PickerError>;
