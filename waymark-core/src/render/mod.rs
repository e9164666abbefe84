//! Drawing of navigation overlays
//!
//! The map imagery itself comes from the board's [`crate::traits::MapScreen`];
//! this module draws what goes on top of it.

pub mod path;
pub mod status;

pub use path::PathRenderer;
pub use status::StatusBar;
