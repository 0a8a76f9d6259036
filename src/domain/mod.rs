//! Domain layer for the chart picker.
//!
//! Core types independent of Zellij APIs, the remote service wire format and
//! the attribute store.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`item`]: Catalog item model and identifiers

pub mod error;
pub mod item;

pub use error::{PickerError, Result};
pub use item::{CatalogItem, ItemId, PLACEHOLDER_TITLE};
