//! Embassy async tasks
//!
//! The zoom buttons each get a task waiting on pin edges, on a higher
//! priority executor than the rest. The navigation loop runs on the main
//! task since it owns the display and the serial link.

pub mod navigation;
pub mod zoom;

pub use navigation::{navigation_loop, TICK_INTERVAL_MS};
pub use zoom::{start_zoom_executor, zoom_button_task, ZOOM};
