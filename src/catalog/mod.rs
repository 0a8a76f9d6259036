//! Remote catalog access.
//!
//! # Modules
//!
//! - [`client`]: Request builders and response parsers for the two reads
//! - [`records`]: Wire records, normalization and capability defaults
//! - [`error`]: Tagged fetch failures

pub mod client;
pub mod error;
pub mod records;

pub use client::{CatalogClient, CatalogRequest, RequestKind, ITEMS_PATH, OPTIONS_PATH};
pub use error::{FetchError, ROUTE_NOT_FOUND_CODE};
pub use records::{normalize_records, CatalogPage, Capabilities, RawCapabilities, RawRecord};
