//! Waymark Hardware Abstraction Layer
//!
//! This crate defines the hardware traits the navigation core is written
//! against. Board crates implement them on top of their chip HAL, and host
//! tests implement them with scripted mocks.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  waymark-core (controller, route client)│
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  waymark-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │  waymark-     │       │  host mocks   │
//! │  firmware     │       │  (tests)      │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::InputPin`] - Digital input (joystick button)
//! - [`adc::AnalogInput`] - Analog axis readings
//! - [`uart::UartTx`], [`uart::UartRx`] - Serial link to the route server
//! - [`time::Clock`] - Free-running millisecond clock

#![no_std]
#![deny(unsafe_code)]

pub mod adc;
pub mod gpio;
pub mod time;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use adc::AnalogInput;
pub use gpio::InputPin;
pub use time::Clock;
pub use uart::{UartRx, UartTx};
