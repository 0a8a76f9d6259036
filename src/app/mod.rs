//! Application layer: the search/selection/fetch state machine.
//!
//! ```text
//! keys, timers, web results, worker replies
//!         │
//!         ▼
//!   PickerController ──► SelectionState ──► ui::render
//!         │
//!         ▼
//!   Vec<Action>  (fetch, wake, persist, open, close)
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effect commands emitted by the controller
//! - [`controller`]: Event processing and commands
//! - [`debounce`]: Trailing-edge search debouncer
//! - [`modes`]: Render state derived from the selection state
//! - [`state`]: Selection state and derived queries

pub mod actions;
pub mod controller;
pub mod debounce;
pub mod modes;
pub mod state;

pub use actions::Action;
pub use controller::{ControllerOptions, Event, PickerController};
pub use debounce::{SearchDebouncer, Wake};
pub use modes::ViewState;
pub use state::{sanitize_search, SelectionState};
