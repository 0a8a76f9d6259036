//! Infrastructure layer for the plugin sandbox environment.
//!
//! - `paths`: where the plugin keeps its files under Zellij's `/host` mount
//! - `cache_bust`: per-mount query suffix for preview image URLs

pub mod cache_bust;
pub mod paths;

pub use cache_bust::CacheBuster;
pub use paths::{expand_tilde, get_data_dir};
