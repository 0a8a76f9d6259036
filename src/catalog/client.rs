//! Catalog service client.
//!
//! The plugin runs on Zellij's single-threaded event loop, where HTTP calls are
//! fire-and-forget: a request is issued with a context map and its result comes
//! back later as an event. The client therefore splits each remote read into
//! two halves:
//!
//! - a request builder ([`CatalogClient::capabilities_request`],
//!   [`CatalogClient::catalog_request`]) producing a [`CatalogRequest`]
//! - a response parser ([`CatalogClient::parse_capabilities`],
//!   [`CatalogClient::parse_catalog`]) producing a normalized value or a
//!   [`FetchError`]
//!
//! The context map attached to each request identifies which read it was and,
//! for catalog reads, the sequence token used to discard stale responses.

use super::error::{FetchError, ROUTE_NOT_FOUND_CODE};
use super::records::{normalize_records, CatalogPage, Capabilities, Lenient, RawCapabilities, RawRecord};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::Deserialize;
use std::collections::BTreeMap;

/// Path of the capability probe endpoint.
pub const OPTIONS_PATH: &str = "/catalog/v1/options";

/// Path prefix of the filtered catalog endpoint; the search text is appended.
pub const ITEMS_PATH: &str = "/catalog/v1/items/";

const CONTEXT_KIND: &str = "kind";
const CONTEXT_TOKEN: &str = "token";
const CONTEXT_PATH: &str = "path";

/// Characters escaped in the search path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b',')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'?');

/// Which remote read a request or response belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    /// One-time capability probe.
    Capabilities,
    /// Filtered catalog listing, tagged with its sequence token.
    Catalog {
        /// Monotonic token assigned when the request was issued.
        token: u64,
    },
}

impl RequestKind {
    /// Recovers the request kind from a response context map.
    ///
    /// Returns `None` for responses this client did not issue.
    #[must_use]
    pub fn from_context(context: &BTreeMap<String, String>) -> Option<Self> {
        match context.get(CONTEXT_KIND).map(String::as_str) {
            Some("capabilities") => Some(Self::Capabilities),
            Some("catalog") => {
                let token = context.get(CONTEXT_TOKEN)?.parse().ok()?;
                Some(Self::Catalog { token })
            }
            _ => None,
        }
    }
}

/// A ready-to-send GET request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogRequest {
    pub kind: RequestKind,
    /// Absolute URL.
    pub url: String,
    /// Endpoint path relative to the API base, kept for error reporting.
    pub path: String,
    pub headers: BTreeMap<String, String>,
    /// Correlation data echoed back with the response.
    pub context: BTreeMap<String, String>,
}

/// Builds catalog requests and normalizes their responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogClient {
    api_base: String,
    headers: BTreeMap<String, String>,
}

impl CatalogClient {
    /// Creates a client rooted at the service's REST base URL.
    ///
    /// ```
    /// use chart_picker::catalog::CatalogClient;
    ///
    /// let client = CatalogClient::new("https://x.test/wp-json/");
    /// assert_eq!(client.capabilities_request().url, "https://x.test/wp-json/catalog/v1/options");
    /// ```
    #[must_use]
    pub fn new(api_base: impl Into<String>) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("Accept".to_string(), "application/json".to_string());

        Self {
            api_base: api_base.into().trim_end_matches('/').to_string(),
            headers,
        }
    }

    /// Adds a header sent with every request (e.g. `Authorization`).
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// The capability probe: `GET /catalog/v1/options`.
    #[must_use]
    pub fn capabilities_request(&self) -> CatalogRequest {
        self.request(RequestKind::Capabilities, OPTIONS_PATH.to_string())
    }

    /// The filtered listing: `GET /catalog/v1/items/{search_text}`.
    ///
    /// An empty search text requests the unfiltered catalog.
    ///
    /// ```
    /// use chart_picker::catalog::CatalogClient;
    ///
    /// let client = CatalogClient::new("https://x.test/wp-json");
    /// let request = client.catalog_request("sales, q1", 4);
    /// assert_eq!(request.url, "https://x.test/wp-json/catalog/v1/items/sales%2C%20q1");
    /// ```
    #[must_use]
    pub fn catalog_request(&self, search_text: &str, token: u64) -> CatalogRequest {
        let segment = utf8_percent_encode(search_text, PATH_SEGMENT).to_string();
        self.request(RequestKind::Catalog { token }, format!("{ITEMS_PATH}{segment}"))
    }

    fn request(&self, kind: RequestKind, path: String) -> CatalogRequest {
        let mut context = BTreeMap::new();
        match kind {
            RequestKind::Capabilities => {
                context.insert(CONTEXT_KIND.to_string(), "capabilities".to_string());
            }
            RequestKind::Catalog { token } => {
                context.insert(CONTEXT_KIND.to_string(), "catalog".to_string());
                context.insert(CONTEXT_TOKEN.to_string(), token.to_string());
            }
        }
        context.insert(CONTEXT_PATH.to_string(), path.clone());

        CatalogRequest {
            kind,
            url: format!("{}{path}", self.api_base),
            path,
            headers: self.headers.clone(),
            context,
        }
    }

    /// Parses the capability probe response.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] for non-success statuses or undecodable bodies.
    pub fn parse_capabilities(&self, status: u16, body: &[u8]) -> Result<Capabilities, FetchError> {
        check_status(status, body, OPTIONS_PATH)?;

        let raw: RawCapabilities =
            serde_json::from_slice(body).map_err(|e| FetchError::Decode(e.to_string()))?;
        Ok(raw.into_capabilities())
    }

    /// Parses a catalog listing response: `[total_available, [records]]`.
    ///
    /// `path` is the request path from the response context, used only for
    /// error reporting.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::RouteNotFound`] when the endpoint does not exist,
    /// and other [`FetchError`] variants for any other failure.
    pub fn parse_catalog(&self, status: u16, body: &[u8], path: &str) -> Result<CatalogPage, FetchError> {
        check_status(status, body, path)?;

        let (total, records): (Lenient, Vec<serde_json::Value>) =
            serde_json::from_slice(body).map_err(|e| FetchError::Decode(e.to_string()))?;

        let records = records
            .into_iter()
            .filter_map(|record| match RawRecord::deserialize(record) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::debug!(error = %e, "skipping malformed catalog record");
                    None
                }
            })
            .collect();
        let items = normalize_records(records);
        let total_available = total.as_count().unwrap_or(items.len() as u64);

        tracing::debug!(
            total_available = total_available,
            item_count = items.len(),
            "catalog page parsed"
        );

        Ok(CatalogPage { total_available, items })
    }

    /// Request path recorded in a response context, if any.
    #[must_use]
    pub fn context_path(context: &BTreeMap<String, String>) -> &str {
        context.get(CONTEXT_PATH).map_or("", String::as_str)
    }
}

/// Error body shape used by the service for failed requests.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<String>,
}

fn check_status(status: u16, body: &[u8], path: &str) -> Result<(), FetchError> {
    if (200..300).contains(&status) {
        return Ok(());
    }

    if status == 0 {
        return Err(FetchError::Transport(String::from_utf8_lossy(body).into_owned()));
    }

    let code = serde_json::from_slice::<ErrorBody>(body).ok().and_then(|b| b.code);
    if code.as_deref() == Some(ROUTE_NOT_FOUND_CODE) {
        return Err(FetchError::RouteNotFound { path: path.to_string() });
    }

    Err(FetchError::Status { status, code })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ItemId;

    fn client() -> CatalogClient {
        CatalogClient::new("https://x.test/wp-json")
    }

    #[test]
    fn empty_search_requests_unfiltered_catalog() {
        let request = client().catalog_request("", 1);
        assert_eq!(request.url, "https://x.test/wp-json/catalog/v1/items/");
        assert_eq!(request.path, "/catalog/v1/items/");
    }

    #[test]
    fn context_round_trips_request_kind() {
        let request = client().catalog_request("abc", 42);
        assert_eq!(
            RequestKind::from_context(&request.context),
            Some(RequestKind::Catalog { token: 42 })
        );
        assert_eq!(CatalogClient::context_path(&request.context), "/catalog/v1/items/abc");

        let probe = client().capabilities_request();
        assert_eq!(RequestKind::from_context(&probe.context), Some(RequestKind::Capabilities));
        assert_eq!(RequestKind::from_context(&BTreeMap::new()), None);
    }

    #[test]
    fn extra_headers_are_sent() {
        let request = client().with_header("Authorization", "Basic abc").capabilities_request();
        assert_eq!(request.headers.get("Authorization").map(String::as_str), Some("Basic abc"));
        assert_eq!(request.headers.get("Accept").map(String::as_str), Some("application/json"));
    }

    #[test]
    fn parses_catalog_page() {
        let body = br#"[5, [{"id": 1, "title": "A"}, {"id": 2, "title": "B", "url": "https://x.test/b.png"}]]"#;
        let page = client().parse_catalog(200, body, "/catalog/v1/items/").unwrap();
        assert_eq!(page.total_available, 5);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].id, ItemId::Int(1));
        assert_eq!(page.items[1].preview_url.as_deref(), Some("https://x.test/b.png"));
    }

    #[test]
    fn malformed_records_do_not_fail_the_page() {
        let body = br#"[null, [{"id": 1, "title": false}, null, "junk", {"id": 2, "title": "B"}]]"#;
        let page = client().parse_catalog(200, body, "/catalog/v1/items/").unwrap();
        assert_eq!(page.total_available, 2);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].title, "-");
        assert_eq!(page.items[1].title, "B");
    }

    #[test]
    fn rest_no_route_is_route_not_found() {
        let body = br#"{"code": "rest_no_route", "message": "No route was found", "data": {"status": 404}}"#;
        let err = client().parse_catalog(404, body, "/catalog/v1/items/x").unwrap_err();
        assert!(err.is_route_not_found());
        assert_eq!(err, FetchError::RouteNotFound { path: "/catalog/v1/items/x".to_string() });
    }

    #[test]
    fn other_failures_stay_distinguishable() {
        let err = client().parse_catalog(500, br#"{"code": "internal"}"#, "/p").unwrap_err();
        assert_eq!(err, FetchError::Status { status: 500, code: Some("internal".to_string()) });

        let err = client().parse_catalog(200, b"not json", "/p").unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));

        let err = client().parse_capabilities(0, b"connection refused").unwrap_err();
        assert_eq!(err, FetchError::Transport("connection refused".to_string()));
    }
}
