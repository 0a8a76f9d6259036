//! Fetch outcome errors for the two remote catalog reads.

use thiserror::Error;

/// Error code the service uses when an endpoint does not exist (plugin
/// disabled, REST routes not registered, wrong base URL).
pub const ROUTE_NOT_FOUND_CODE: &str = "rest_no_route";

/// Why a catalog or capability read failed.
///
/// Fetch outcomes are an explicit tagged result: the controller decides how
/// each variant surfaces instead of catching a single error code and dropping
/// the rest.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The remote endpoint does not exist.
    #[error("route not found: {path}")]
    RouteNotFound {
        /// Path that was requested.
        path: String,
    },

    /// The service answered with a non-success status that is not a missing route.
    #[error("service responded with HTTP {status}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Machine-readable error code from the body, when one was present.
        code: Option<String>,
    },

    /// The response body could not be decoded.
    #[error("malformed response: {0}")]
    Decode(String),

    /// The request never produced an HTTP response.
    #[error("transport failure: {0}")]
    Transport(String),
}

impl FetchError {
    /// Whether this is the recognized "endpoint unavailable" condition.
    #[must_use]
    pub const fn is_route_not_found(&self) -> bool {
        matches!(self, Self::RouteNotFound { .. })
    }
}
