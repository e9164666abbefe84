//! Configuration type definitions
//!
//! Every field has a default matching the reference hardware: a 128×160
//! TFT with a 12-pixel status strip, an analog thumb joystick, two zoom
//! buttons and a 9600 baud link to the path server.

use heapless::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::toml::ParseError;

/// Maximum number of zoom levels
pub const MAX_MAP_LEVELS: usize = 8;

/// Joystick sampling configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct JoystickConfig {
    /// Offsets up to this magnitude read as zero (10-bit units)
    pub dead_zone: u16,
    /// Offset to cursor-delta divisor
    pub divisor: u16,
    /// Minimum time between button samples (ms)
    pub button_sample_ms: u32,
    /// Readings averaged for center calibration
    pub calibration_samples: u8,
}

impl Default for JoystickConfig {
    fn default() -> Self {
        Self {
            dead_zone: 4,
            divisor: 128,
            button_sample_ms: 200,
            calibration_samples: 8,
        }
    }
}

/// Zoom button configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ZoomConfig {
    /// Edges closer together than this are ignored (ms)
    pub debounce_ms: u32,
    /// Zoom level shown at boot
    pub initial_level: u8,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 500,
            initial_level: 1,
        }
    }
}

/// Screen geometry and scrolling behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ScreenConfig {
    /// Map window width in pixels
    pub width: u16,
    /// Map window height in pixels; the status strip starts below it
    pub map_height: u16,
    /// Status strip height in pixels
    pub status_height: u16,
    /// Cursor x below this scrolls left
    pub left_margin: i32,
    /// Cursor x above this scrolls right
    pub right_margin: i32,
    /// Cursor y below this scrolls up
    pub top_margin: i32,
    /// Cursor y above this scrolls down
    pub bottom_margin: i32,
    /// Pixels scrolled per step
    pub scroll_step: i32,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            width: 128,
            map_height: 148,
            status_height: 12,
            left_margin: 10,
            right_margin: 117,
            top_margin: 10,
            bottom_margin: 117,
            scroll_step: 32,
        }
    }
}

impl ScreenConfig {
    /// First row of the status strip
    pub fn status_y(&self) -> i32 {
        i32::from(self.map_height)
    }
}

/// Route request behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RouteConfig {
    /// Give up when the server stays silent this long (ms)
    pub timeout_ms: u32,
    /// Largest route accepted, in points
    pub max_points: u16,
    /// How long failure notices stay in the status strip (ms)
    pub status_hold_ms: u32,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 5000,
            max_points: 1000,
            status_hold_ms: 2000,
        }
    }
}

/// Serial link to the path server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SerialConfig {
    /// Baud rate
    pub baudrate: u32,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self { baudrate: 9600 }
    }
}

/// Geographic bounds and bitmap size of one zoom level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MapBox {
    /// Latitude of the top edge
    pub north: i32,
    /// Latitude of the bottom edge
    pub south: i32,
    /// Longitude of the left edge
    pub west: i32,
    /// Longitude of the right edge
    pub east: i32,
    /// Bitmap width in pixels
    pub width: u32,
    /// Bitmap height in pixels
    pub height: u32,
}

impl MapBox {
    /// Edmonton bounds at a given bitmap size
    pub const fn edmonton(size: u32) -> Self {
        Self {
            north: 5_361_858,
            south: 5_340_953,
            west: -11_368_652,
            east: -11_333_496,
            width: size,
            height: size,
        }
    }

    fn is_valid(&self) -> bool {
        self.north > self.south && self.east > self.west && self.width > 0 && self.height > 0
    }
}

/// Complete device configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NavConfig {
    pub joystick: JoystickConfig,
    pub zoom: ZoomConfig,
    pub screen: ScreenConfig,
    pub route: RouteConfig,
    pub serial: SerialConfig,
    /// Zoom levels, most zoomed-out first
    #[cfg_attr(feature = "serde", serde(rename = "map"))]
    pub maps: Vec<MapBox, MAX_MAP_LEVELS>,
}

impl Default for NavConfig {
    fn default() -> Self {
        let mut maps = Vec::new();
        for size in [512, 1024, 2048, 4096, 8192] {
            // Five levels fit in MAX_MAP_LEVELS
            let _ = maps.push(MapBox::edmonton(size));
        }
        Self {
            joystick: JoystickConfig::default(),
            zoom: ZoomConfig::default(),
            screen: ScreenConfig::default(),
            route: RouteConfig::default(),
            serial: SerialConfig::default(),
            maps,
        }
    }
}

impl NavConfig {
    /// Highest zoom level index
    pub fn max_level(&self) -> u8 {
        self.maps.len().saturating_sub(1) as u8
    }

    /// Check values that would make the controller misbehave
    pub fn validate(&self) -> Result<(), ParseError> {
        if self.maps.is_empty() || !self.maps.iter().all(MapBox::is_valid) {
            return Err(ParseError::Inconsistent);
        }
        if self.zoom.initial_level > self.max_level() {
            return Err(ParseError::Inconsistent);
        }
        if self.joystick.divisor == 0 {
            return Err(ParseError::InvalidValue);
        }
        let screen = &self.screen;
        if screen.width == 0 || screen.map_height == 0 || screen.scroll_step <= 0 {
            return Err(ParseError::InvalidValue);
        }
        if screen.left_margin >= screen.right_margin || screen.top_margin >= screen.bottom_margin
        {
            return Err(ParseError::Inconsistent);
        }
        Ok(())
    }
}
