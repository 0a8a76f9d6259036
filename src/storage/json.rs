//! JSON file-based storage backend.
//!
//! A human-readable store of block attributes. Writes go to a temporary file
//! first and are renamed over the target, so a crash mid-write never leaves a
//! truncated file behind.
//!
//! # File Format
//!
//! ```json
//! {
//!   "version": 1,
//!   "blocks": {
//!     "block-1": { "chartId": 42, "updated_at": 1700000000 }
//!   }
//! }
//! ```

use crate::domain::error::{PickerError, Result};
use crate::storage::backend::Storage;
use crate::storage::models::BlockAttributes;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

const FORMAT_VERSION: u32 = 1;

/// Top-level structure serialized to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StorageData {
    /// Version of the storage format for future migrations.
    version: u32,

    #[serde(default)]
    blocks: BTreeMap<String, BlockAttributes>,
}

impl Default for StorageData {
    fn default() -> Self {
        Self {
            version: FORMAT_VERSION,
            blocks: BTreeMap::new(),
        }
    }
}

/// JSON file storage backend.
///
/// The whole file is kept in memory and rewritten on every modification.
/// `Send` but not `Sync`: it lives on the worker thread only.
pub struct JsonStorage {
    file_path: PathBuf,
    data: StorageData,
    dirty: bool,
}

impl JsonStorage {
    /// Creates or opens a JSON storage backend.
    ///
    /// Parent directories are created automatically.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Parent directory creation fails
    /// - File exists but contains invalid JSON
    /// - File permissions prevent reading
    pub fn new(file_path: PathBuf) -> Result<Self> {
        tracing::debug!(path = ?file_path, "initializing JSON storage");

        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let data = if file_path.exists() {
            Self::load_from_file(&file_path)?
        } else {
            tracing::debug!("initializing new empty storage");
            StorageData::default()
        };

        tracing::debug!(block_count = data.blocks.len(), "storage initialized");

        Ok(Self {
            file_path,
            data,
            dirty: false,
        })
    }

    fn load_from_file(path: &Path) -> Result<StorageData> {
        let contents = std::fs::read_to_string(path)?;
        if contents.trim().is_empty() {
            return Ok(StorageData::default());
        }

        let data: StorageData = serde_json::from_str(&contents)
            .map_err(|e| PickerError::Storage(format!("failed to parse JSON: {e}")))?;

        if data.version != FORMAT_VERSION {
            tracing::warn!(version = data.version, "unexpected storage format version");
        }

        tracing::debug!(version = data.version, blocks = data.blocks.len(), "loaded storage data");
        Ok(data)
    }

    fn save_to_file(&mut self) -> Result<()> {
        if !self.dirty {
            tracing::trace!("skipping save, no changes");
            return Ok(());
        }

        let json = serde_json::to_string_pretty(&self.data)
            .map_err(|e| PickerError::Storage(format!("failed to serialize JSON: {e}")))?;

        let tmp_path = self.file_path.with_extension("tmp");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.file_path)?;

        self.dirty = false;
        tracing::debug!(path = ?self.file_path, "storage saved");
        Ok(())
    }
}

impl Storage for JsonStorage {
    fn get_attributes(&self, block_id: &str) -> Result<Option<BlockAttributes>> {
        let attributes = self.data.blocks.get(block_id).cloned();
        tracing::debug!(block_id = %block_id, found = attributes.is_some(), "attributes lookup");
        Ok(attributes)
    }

    fn set_attributes(&mut self, block_id: &str, attributes: &BlockAttributes) -> Result<()> {
        let _span = tracing::debug_span!("json_set_attributes", block_id = %block_id).entered();

        if self.data.blocks.get(block_id) == Some(attributes) {
            return Ok(());
        }

        self.data.blocks.insert(block_id.to_string(), attributes.clone());
        self.dirty = true;
        self.save_to_file()
    }
}

impl Drop for JsonStorage {
    fn drop(&mut self) {
        if self.dirty {
            if let Err(e) = self.save_to_file() {
                tracing::error!(error = %e, "failed to save on drop");
            }
        }
    }
}
