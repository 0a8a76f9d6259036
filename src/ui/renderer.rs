//! Top-level rendering coordinator.
//!
//! Rendering is two steps: compute the [`UIViewModel`] from the controller,
//! then hand it to the layout that matches its body. The frame is built in a
//! buffer and printed in one go.

use crate::app::PickerController;
use crate::ui::components;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{compute_viewmodel, Body, UIViewModel};

/// Renders the picker to stdout.
pub fn render(controller: &PickerController, theme: &Theme, rows: usize, cols: usize) {
    print!("{}", render_to_string(controller, theme, rows, cols));
}

/// Renders the picker into an ANSI string.
#[must_use]
pub fn render_to_string(controller: &PickerController, theme: &Theme, rows: usize, cols: usize) -> String {
    let viewmodel = compute_viewmodel(controller, rows, cols);
    render_viewmodel(&viewmodel, theme, rows, cols)
}

fn render_viewmodel(vm: &UIViewModel, theme: &Theme, rows: usize, cols: usize) -> String {
    let mut out = String::new();

    match &vm.body {
        Body::Message(message) => {
            components::render_message_layout(&mut out, &vm.header, message, &vm.footer, theme, cols, rows);
        }
        Body::Browse(browse) => {
            components::render_browse_layout(&mut out, &vm.header, browse, &vm.footer, theme, cols, rows);
        }
        Body::Preview(preview) => {
            components::render_preview_layout(&mut out, &vm.header, preview, &vm.footer, theme, cols, rows);
        }
    }

    out
}
