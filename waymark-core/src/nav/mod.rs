//! Cursor, viewport and point selection
//!
//! [`NavigationController`] owns all navigation state and is driven one
//! tick at a time by the main loop.

pub mod controller;
pub mod selection;
pub mod viewport;

pub use controller::{NavigationController, Redraw, TickInput};
pub use selection::SelectionState;
pub use viewport::Viewport;
