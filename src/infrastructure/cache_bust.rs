//! Cache-busting suffix for preview image URLs.
//!
//! Preview images are regenerated server-side under the same URL, so each
//! mount appends a random `random=N` query parameter. `N` is drawn once per
//! mount: every preview in one session shares it, a remount gets a new one.

use rand::Rng;

/// Exclusive upper bound of the random suffix.
pub const NONCE_RANGE: u32 = 1_000_000;

/// Per-mount cache-busting nonce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheBuster {
    nonce: u32,
}

impl CacheBuster {
    /// Draws a fresh nonce from `0..1_000_000`.
    #[must_use]
    pub fn random() -> Self {
        Self::new(rand::thread_rng().gen_range(0..NONCE_RANGE))
    }

    /// Uses a fixed nonce.
    #[must_use]
    pub const fn new(nonce: u32) -> Self {
        Self { nonce }
    }

    #[must_use]
    pub const fn nonce(&self) -> u32 {
        self.nonce
    }

    /// Appends the nonce to `url`, respecting an existing query string.
    ///
    /// ```
    /// use chart_picker::infrastructure::CacheBuster;
    ///
    /// let buster = CacheBuster::new(7);
    /// assert_eq!(buster.apply("https://x.test/a.png"), "https://x.test/a.png?random=7");
    /// assert_eq!(buster.apply("https://x.test/a.png?v=2"), "https://x.test/a.png?v=2&random=7");
    /// ```
    #[must_use]
    pub fn apply(&self, url: &str) -> String {
        let separator = if url.contains('?') { '&' } else { '?' };
        format!("{url}{separator}random={}", self.nonce)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_nonce_stays_in_range() {
        for _ in 0..64 {
            assert!(CacheBuster::random().nonce() < NONCE_RANGE);
        }
    }

    #[test]
    fn fragment_free_urls_get_query_parameter() {
        let buster = CacheBuster::new(0);
        assert_eq!(buster.apply("/img.png"), "/img.png?random=0");
    }
}
