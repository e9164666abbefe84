//! Geographic to map-pixel projection
//!
//! Every zoom level is one bitmap covering the same geographic box. A map
//! pixel is a coordinate inside that bitmap:
//!
//! ```text
//!   west              east
//!  north ┌───────────────┐ (width, 0)
//!        │      y ↓      │
//!        │   x →         │
//!  south └───────────────┘ (width, height)
//! ```

use heapless::Vec;
use waymark_protocol::GeoPoint;

use crate::config::{MapBox, MAX_MAP_LEVELS};

/// Pixel coordinate inside one zoom level's bitmap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MapPoint {
    pub x: i32,
    pub y: i32,
}

impl MapPoint {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Conversion between geographic points and map pixels per zoom level
pub trait Projection {
    /// Number of zoom levels
    fn levels(&self) -> u8;

    /// Bitmap size `(width, height)` of a level
    fn map_size(&self, level: u8) -> (u32, u32);

    /// Project a geographic point onto a level's bitmap
    fn to_map(&self, level: u8, point: GeoPoint) -> MapPoint;

    /// Inverse of [`Projection::to_map`]
    fn to_geo(&self, level: u8, point: MapPoint) -> GeoPoint;

    /// Highest valid level index
    fn max_level(&self) -> u8 {
        self.levels().saturating_sub(1)
    }
}

/// Equirectangular projection from per-level bounding boxes
///
/// Levels past the last box reuse the last box.
#[derive(Debug, Clone)]
pub struct LinearProjection {
    boxes: Vec<MapBox, MAX_MAP_LEVELS>,
}

impl LinearProjection {
    /// Build from level boxes, most zoomed-out first
    ///
    /// Returns `None` when `boxes` is empty, has more than
    /// [`MAX_MAP_LEVELS`] entries, or contains a degenerate box.
    pub fn new(boxes: &[MapBox]) -> Option<Self> {
        if boxes.is_empty() {
            return None;
        }
        let degenerate = boxes
            .iter()
            .any(|b| b.north <= b.south || b.east <= b.west || b.width == 0 || b.height == 0);
        if degenerate {
            return None;
        }
        let boxes = Vec::from_slice(boxes).ok()?;
        Some(Self { boxes })
    }

    fn level_box(&self, level: u8) -> &MapBox {
        let index = usize::from(level).min(self.boxes.len() - 1);
        &self.boxes[index]
    }
}

impl Projection for LinearProjection {
    fn levels(&self) -> u8 {
        self.boxes.len() as u8
    }

    fn map_size(&self, level: u8) -> (u32, u32) {
        let b = self.level_box(level);
        (b.width, b.height)
    }

    fn to_map(&self, level: u8, point: GeoPoint) -> MapPoint {
        let b = self.level_box(level);
        let x = scale(
            i64::from(point.lon) - i64::from(b.west),
            i64::from(b.width),
            i64::from(b.east) - i64::from(b.west),
        );
        let y = scale(
            i64::from(b.north) - i64::from(point.lat),
            i64::from(b.height),
            i64::from(b.north) - i64::from(b.south),
        );
        MapPoint::new(x, y)
    }

    fn to_geo(&self, level: u8, point: MapPoint) -> GeoPoint {
        let b = self.level_box(level);
        let lon = i64::from(b.west)
            + i64::from(scale(
                i64::from(point.x),
                i64::from(b.east) - i64::from(b.west),
                i64::from(b.width),
            ));
        let lat = i64::from(b.north)
            - i64::from(scale(
                i64::from(point.y),
                i64::from(b.north) - i64::from(b.south),
                i64::from(b.height),
            ));
        GeoPoint::new(saturate(lat), saturate(lon))
    }
}

/// `value * num / den` in 64-bit, saturated to i32
fn scale(value: i64, num: i64, den: i64) -> i32 {
    saturate(value.saturating_mul(num) / den)
}

fn saturate(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}
