//! User input handling
//!
//! - [`joystick`]: analog stick with dead zone and select button
//! - [`zoom`]: interrupt-side zoom request latch
//! - [`debounce`]: shared edge acceptance rule

pub mod debounce;
pub mod joystick;
pub mod zoom;

pub use debounce::accept_edge;
pub use joystick::{axis_delta, ButtonEdgeDetector, Joystick, JoystickSample};
pub use zoom::{ZoomDirection, ZoomLatch};
