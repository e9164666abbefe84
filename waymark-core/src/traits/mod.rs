//! Collaborator traits
//!
//! The navigation logic draws and projects through these traits. Boards
//! implement them over a concrete display and map store.

pub mod canvas;
pub mod projection;

pub use canvas::{Canvas, Color, DisplayError, MapScreen, ScreenPoint};
pub use projection::{LinearProjection, MapPoint, Projection};
