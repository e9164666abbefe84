//! Board-agnostic navigation logic for the Waymark map device
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Joystick sampling and zoom-button debouncing
//! - Navigation controller (cursor, viewport, point selection)
//! - Route request client for the serial path server
//! - Route polyline and status bar rendering
//! - Collaborator traits (projection, canvas, map screen)
//! - Configuration types and parser
//!
//! # Main loop
//!
//! ```text
//!  Joystick::sample ──┐
//!                     ├──► NavigationController::tick ──► RouteService
//!  ZoomLatch::poll ───┘              │                    (blocking)
//!                                    ▼
//!                      NavigationController::render ──► MapScreen
//! ```
//!
//! Zoom handlers run in interrupt context and only touch [`input::ZoomLatch`].
//! Everything else runs in the loop, one tick at a time.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

#[macro_use]
mod logging;

pub mod config;
pub mod input;
pub mod nav;
pub mod render;
pub mod route;
pub mod traits;

#[cfg(test)]
mod testing;

pub use waymark_protocol::GeoPoint;
