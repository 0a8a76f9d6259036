//! Storage backend abstraction.
//!
//! The [`Storage`] trait is the host's attribute setter as the worker sees
//! it: a key-value store from block id to [`BlockAttributes`]. Backends only
//! need to honor last-write-wins per block.

use crate::domain::error::Result;
use crate::storage::models::BlockAttributes;

/// Abstraction over persistent attribute backends.
///
/// # Implementations
///
/// - [`JsonStorage`](crate::storage::JsonStorage): JSON file with atomic writes
///
/// # Examples
///
/// ```no_run
/// use chart_picker::storage::{BlockAttributes, JsonStorage, Storage};
/// use std::path::PathBuf;
///
/// let mut storage = JsonStorage::new(PathBuf::from("/tmp/attributes.json"))?;
/// storage.set_attributes("block-1", &BlockAttributes::new(None))?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait Storage: Send {
    /// Returns the stored attributes of a block, `Ok(None)` if it has none.
    ///
    /// # Errors
    ///
    /// Returns an error if the read operation fails.
    fn get_attributes(&self, block_id: &str) -> Result<Option<BlockAttributes>>;

    /// Replaces the attributes of a block.
    ///
    /// # Errors
    ///
    /// Returns an error if the write cannot be persisted.
    fn set_attributes(&mut self, block_id: &str, attributes: &BlockAttributes) -> Result<()>;
}
