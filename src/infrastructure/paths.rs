//! Path handling for the Zellij plugin sandbox, where the host filesystem is
//! mounted under `/host`.

use std::path::PathBuf;

/// Returns the data directory holding the attribute store and trace file.
///
/// `/host` points at the cwd of the last focused terminal (usually the home
/// directory), so this is typically `~/.local/share/zellij/chart-picker`.
///
/// # Examples
///
/// ```
/// use chart_picker::infrastructure::get_data_dir;
///
/// assert_eq!(get_data_dir().to_str(), Some("/host/.local/share/zellij/chart-picker"));
/// ```
#[must_use]
pub fn get_data_dir() -> PathBuf {
    PathBuf::from("/host/.local/share/zellij").join("chart-picker")
}

/// Expands tilde paths to use the `/host` prefix for Zellij sandbox.
///
/// # Examples
///
/// ```
/// use chart_picker::infrastructure::expand_tilde;
///
/// assert_eq!(expand_tilde("~/themes/dark.toml"), "/host/themes/dark.toml");
/// assert_eq!(expand_tilde("~"), "/host");
/// assert_eq!(expand_tilde("/absolute/path"), "/absolute/path");
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> String {
    if path.starts_with("~/") {
        path.replacen('~', "/host", 1)
    } else if path == "~" {
        "/host".to_string()
    } else {
        path.to_string()
    }
}
