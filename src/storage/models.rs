//! Storage record models for the attribute store.
//!
//! These are the persisted shapes. They are kept apart from the selection
//! state so the on-disk format can change without touching the controller.

use crate::domain::ItemId;
use serde::{Deserialize, Serialize};

/// Attributes the picker persists for one embedded block.
///
/// The host document keeps one record per block id; the picker writes it on
/// every select or clear and reads it once at mount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockAttributes {
    /// The chosen chart, `None` after the selection was cleared.
    #[serde(rename = "chartId", default, skip_serializing_if = "Option::is_none")]
    pub chart_id: Option<ItemId>,

    /// Unix timestamp of the last write.
    #[serde(default)]
    pub updated_at: i64,
}

impl BlockAttributes {
    /// Creates a record stamped with the current time.
    ///
    /// Blank ids are stored as a cleared selection.
    ///
    /// # Examples
    ///
    /// ```
    /// use chart_picker::domain::ItemId;
    /// use chart_picker::storage::BlockAttributes;
    ///
    /// let attributes = BlockAttributes::new(Some(ItemId::from("  ")));
    /// assert!(attributes.chart_id.is_none());
    /// ```
    #[must_use]
    pub fn new(chart_id: Option<ItemId>) -> Self {
        Self {
            chart_id: chart_id.filter(|id| !id.is_blank()),
            updated_at: chrono::Utc::now().timestamp(),
        }
    }
}
