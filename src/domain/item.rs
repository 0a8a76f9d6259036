//! Catalog item domain model.
//!
//! A [`CatalogItem`] is one selectable chart, fully populated: every field a raw
//! service record may omit has an explicit default by the time it gets here, so
//! nothing past the catalog client needs to reason about "possibly missing"
//! values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Title shown for items the service returned without one.
pub const PLACEHOLDER_TITLE: &str = "-";

/// Opaque chart identifier as issued by the remote service.
///
/// The service may hand out integers or strings. Comparison is strict: the
/// integer `1` and the string `"1"` are different ids, which mirrors how the
/// host stores whatever it was given.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    /// Numeric identifier (post id style).
    Int(i64),
    /// Textual identifier.
    Text(String),
}

impl ItemId {
    /// Returns `true` for the empty-string id, which the host uses to mean
    /// "nothing selected".
    ///
    /// ```
    /// use chart_picker::ItemId;
    ///
    /// assert!(ItemId::Text(String::new()).is_blank());
    /// assert!(!ItemId::Int(0).is_blank());
    /// ```
    #[must_use]
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Text(text) if text.trim().is_empty())
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(id) => write!(f, "{id}"),
            Self::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for ItemId {
    fn from(id: i64) -> Self {
        Self::Int(id)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self::Text(id.to_string())
    }
}

/// One selectable chart from the remote catalog.
///
/// # Fields
///
/// - `id`: unique within one fetch result
/// - `title`: display title, [`PLACEHOLDER_TITLE`] when the service sent none
/// - `subtitle`: optional secondary line
/// - `width` / `height`: positive dimensions used for the aspect ratio
/// - `kind`: category tag (`type` on the wire), empty when unknown
/// - `preview_url`: image preview; `None` renders a text placeholder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: ItemId,
    pub title: String,
    pub subtitle: Option<String>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub kind: String,
    pub preview_url: Option<String>,
}

impl CatalogItem {
    /// Creates an item with only an id and title set.
    #[must_use]
    pub fn new(id: impl Into<ItemId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            subtitle: None,
            width: None,
            height: None,
            kind: String::new(),
            preview_url: None,
        }
    }

    /// Display aspect ratio (`width / height`), when both dimensions are known.
    ///
    /// ```
    /// use chart_picker::CatalogItem;
    ///
    /// let mut item = CatalogItem::new(1, "Revenue");
    /// assert_eq!(item.aspect_ratio(), None);
    ///
    /// item.width = Some(800.0);
    /// item.height = Some(400.0);
    /// assert_eq!(item.aspect_ratio(), Some(2.0));
    /// ```
    #[must_use]
    pub fn aspect_ratio(&self) -> Option<f64> {
        match (self.width, self.height) {
            (Some(width), Some(height)) if height > 0.0 => Some(width / height),
            _ => None,
        }
    }
}
