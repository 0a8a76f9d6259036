//! Terminal rendering of the picker.
//!
//! ```text
//! PickerController → compute_viewmodel → UIViewModel → components → ANSI frame
//! ```
//!
//! # Modules
//!
//! - [`viewmodel`]: display-ready data derived from the selection state
//! - [`renderer`]: picks the layout for the current render state
//! - [`components`]: header, search box, list, messages, preview, footer
//! - [`helpers`]: cursor positioning, centering and match highlighting
//! - [`theme`]: color schemes and ANSI escape sequences

pub mod components;
pub mod helpers;
pub mod renderer;
pub mod theme;
pub mod viewmodel;

pub use renderer::{render, render_to_string};
pub use theme::Theme;
pub use viewmodel::{
    compute_viewmodel, Body, BrowseInfo, DisplayItem, FooterInfo, HeaderInfo, MessageInfo, PreviewInfo,
    SearchBarInfo, Tone, UIViewModel,
};
