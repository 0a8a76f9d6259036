//! Wire records returned by the catalog service and their normalization.
//!
//! Everything the service may omit is optional here and nowhere else:
//! [`normalize_records`] turns raw records into fully populated
//! [`CatalogItem`]s and [`RawCapabilities::into_capabilities`] applies the
//! capability defaults.

use crate::domain::{CatalogItem, ItemId, PLACEHOLDER_TITLE};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::HashSet;

/// A number the service may encode either as JSON number or numeric string.
///
/// Any other JSON value (`null`, booleans, objects) is kept as `Other` and
/// reads as absent.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Lenient {
    Number(f64),
    Text(String),
    Other(Value),
}

impl Lenient {
    fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Text(text) => text.trim().parse().ok(),
            Self::Other(_) => None,
        }
        .filter(|value: &f64| value.is_finite())
    }

    /// Non-negative integer view, used for counts.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn as_count(&self) -> Option<u64> {
        self.as_f64().filter(|value| *value >= 0.0).map(|value| value as u64)
    }

    /// Strictly positive view, used for dimensions.
    #[must_use]
    pub fn as_dimension(&self) -> Option<f64> {
        self.as_f64().filter(|value| *value > 0.0)
    }
}

/// One raw chart record as served by `GET /catalog/v1/items/{search}`.
///
/// Fields of the wrong JSON type read as absent, so one malformed field never
/// rejects the whole listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRecord {
    #[serde(default, deserialize_with = "loose_id")]
    pub id: Option<ItemId>,
    #[serde(default, deserialize_with = "loose_text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub width: Option<Lenient>,
    #[serde(default)]
    pub height: Option<Lenient>,
    #[serde(default, rename = "type", deserialize_with = "loose_text")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub url: Option<String>,
}

fn loose_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => Some(text),
        _ => None,
    })
}

fn loose_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<ItemId>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(ItemId::deserialize(value).ok())
}

impl RawRecord {
    /// Normalizes the record, or returns `None` when it carries no usable id.
    #[must_use]
    pub fn into_item(self) -> Option<CatalogItem> {
        let id = self.id.filter(|id| !id.is_blank())?;

        Some(CatalogItem {
            id,
            title: non_empty(self.title).unwrap_or_else(|| PLACEHOLDER_TITLE.to_string()),
            subtitle: non_empty(self.subtitle),
            width: self.width.as_ref().and_then(Lenient::as_dimension),
            height: self.height.as_ref().and_then(Lenient::as_dimension),
            kind: self.kind.unwrap_or_default(),
            preview_url: non_empty(self.url),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.is_empty())
}

/// Response body of `GET /catalog/v1/options`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawCapabilities {
    #[serde(default = "default_image_support")]
    pub image_support_active: bool,
    #[serde(default)]
    pub siteurl: Option<String>,
    #[serde(default, rename = "maxAvailable")]
    pub max_available: Option<Lenient>,
}

const fn default_image_support() -> bool {
    true
}

/// Service capabilities learned from the one-time probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capabilities {
    /// Whether preview images are available; affects rendering only.
    pub image_support_enabled: bool,
    /// Base URL for create/edit links, without trailing slash.
    pub origin_url: Option<String>,
    /// Size of the unfiltered catalog.
    pub max_available: u64,
}

impl RawCapabilities {
    #[must_use]
    pub fn into_capabilities(self) -> Capabilities {
        Capabilities {
            image_support_enabled: self.image_support_active,
            origin_url: non_empty(self.siteurl.map(|url| url.trim_end_matches('/').to_string())),
            max_available: self.max_available.as_ref().and_then(Lenient::as_count).unwrap_or(0),
        }
    }
}

/// One filtered catalog result set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogPage {
    /// The server's own count for the current search.
    pub total_available: u64,
    /// Normalized items in server order.
    pub items: Vec<CatalogItem>,
}

/// Normalizes raw records, preserving server order.
///
/// Records without an id are skipped, and a record repeating an id already
/// seen in this result is skipped (first occurrence wins).
#[must_use]
pub fn normalize_records(records: Vec<RawRecord>) -> Vec<CatalogItem> {
    let mut seen = HashSet::new();
    let mut items = Vec::with_capacity(records.len());

    for record in records {
        let Some(item) = record.into_item() else {
            tracing::debug!("skipping catalog record without id");
            continue;
        };

        if seen.insert(item.id.clone()) {
            items.push(item);
        } else {
            tracing::debug!(item_id = %item.id, "skipping duplicate catalog record");
        }
    }

    items
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(json: &str) -> Vec<RawRecord> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn missing_or_empty_title_becomes_placeholder() {
        let items = normalize_records(records(r#"[{"id": 1}, {"id": 2, "title": ""}, {"id": 3, "title": null}]"#));
        assert!(items.iter().all(|item| item.title == PLACEHOLDER_TITLE));
    }

    #[test]
    fn missing_type_and_url_use_sentinels() {
        let items = normalize_records(records(r#"[{"id": 1, "title": "A", "url": ""}]"#));
        assert_eq!(items[0].kind, "");
        assert_eq!(items[0].preview_url, None);
    }

    #[test]
    fn keeps_server_order_and_drops_duplicates() {
        let items = normalize_records(records(
            r#"[{"id": 3, "title": "C"}, {"id": 1, "title": "A"}, {"id": 3, "title": "again"}, {"title": "no id"}]"#,
        ));
        let titles: Vec<&str> = items.iter().map(|item| item.title.as_str()).collect();
        assert_eq!(titles, vec!["C", "A"]);
    }

    #[test]
    fn dimensions_accept_numeric_strings_and_reject_non_positive() {
        let items = normalize_records(records(r#"[{"id": "a", "width": "640", "height": 0}]"#));
        assert_eq!(items[0].width, Some(640.0));
        assert_eq!(items[0].height, None);
    }

    #[test]
    fn wrongly_typed_fields_read_as_absent() {
        let items = normalize_records(records(
            r#"[{"id": 1, "title": false, "subtitle": 3, "type": {}, "url": true, "width": null}, {"id": true, "title": "B"}]"#,
        ));
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, PLACEHOLDER_TITLE);
        assert_eq!(items[0].subtitle, None);
        assert_eq!(items[0].kind, "");
        assert_eq!(items[0].preview_url, None);
        assert_eq!(items[0].width, None);
    }

    #[test]
    fn capabilities_default_when_fields_missing() {
        let raw: RawCapabilities = serde_json::from_str("{}").unwrap();
        let caps = raw.into_capabilities();
        assert!(caps.image_support_enabled);
        assert_eq!(caps.origin_url, None);
        assert_eq!(caps.max_available, 0);
    }

    #[test]
    fn capabilities_trim_origin_trailing_slash() {
        let raw: RawCapabilities = serde_json::from_str(
            r#"{"image_support_active": false, "siteurl": "https://x.test/", "maxAvailable": "5"}"#,
        )
        .unwrap();
        let caps = raw.into_capabilities();
        assert!(!caps.image_support_enabled);
        assert_eq!(caps.origin_url.as_deref(), Some("https://x.test"));
        assert_eq!(caps.max_available, 5);
    }
}
