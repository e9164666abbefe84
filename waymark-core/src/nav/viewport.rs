//! Visible window into one zoom level's map

use crate::traits::{MapPoint, ScreenPoint};

/// The part of the current level's bitmap shown on screen
///
/// `origin` is the map pixel drawn at the top-left corner of the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Viewport {
    pub level: u8,
    pub origin: MapPoint,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const fn new(level: u8, width: u32, height: u32) -> Self {
        Self {
            level,
            origin: MapPoint::new(0, 0),
            width,
            height,
        }
    }

    /// Viewport of `level` centered on `center`, clamped to the map
    pub fn centered_on(
        level: u8,
        center: MapPoint,
        width: u32,
        height: u32,
        map_size: (u32, u32),
    ) -> Self {
        let mut viewport = Self::new(level, width, height);
        viewport.move_to(
            MapPoint::new(
                center.x - (width / 2) as i32,
                center.y - (height / 2) as i32,
            ),
            map_size,
        );
        viewport
    }

    /// Place the top-left corner at `origin`, kept inside the map
    ///
    /// A map smaller than the window is pinned at origin `(0, 0)`.
    pub fn move_to(&mut self, origin: MapPoint, map_size: (u32, u32)) {
        let max_x = map_size.0.saturating_sub(self.width) as i32;
        let max_y = map_size.1.saturating_sub(self.height) as i32;
        self.origin = MapPoint::new(origin.x.clamp(0, max_x), origin.y.clamp(0, max_y));
    }

    /// Copy shifted by `(dx, dy)` map pixels, clamped to the map
    pub fn scrolled(&self, dx: i32, dy: i32, map_size: (u32, u32)) -> Self {
        let mut next = *self;
        next.move_to(
            MapPoint::new(self.origin.x + dx, self.origin.y + dy),
            map_size,
        );
        next
    }

    /// Screen position of a map pixel
    ///
    /// Saturates for points far outside the window.
    pub fn to_screen(&self, point: MapPoint) -> ScreenPoint {
        ScreenPoint::new(
            point.x.saturating_sub(self.origin.x),
            point.y.saturating_sub(self.origin.y),
        )
    }

    pub fn to_map(&self, point: ScreenPoint) -> MapPoint {
        MapPoint::new(
            point.x.saturating_add(self.origin.x),
            point.y.saturating_add(self.origin.y),
        )
    }

    /// Nearest map pixel that is both on screen and on the map
    pub fn clamp_point(&self, point: MapPoint, map_size: (u32, u32)) -> MapPoint {
        let right = (self.origin.x + self.width as i32).min(map_size.0 as i32) - 1;
        let bottom = (self.origin.y + self.height as i32).min(map_size.1 as i32) - 1;
        MapPoint::new(
            point.x.clamp(self.origin.x, right.max(self.origin.x)),
            point.y.clamp(self.origin.y, bottom.max(self.origin.y)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAP: (u32, u32) = (512, 512);

    #[test]
    fn test_centered_on() {
        let v = Viewport::centered_on(0, MapPoint::new(256, 256), 128, 148, MAP);
        assert_eq!(v.origin, MapPoint::new(192, 182));
        assert_eq!(v.to_screen(MapPoint::new(256, 256)), ScreenPoint::new(64, 74));
    }

    #[test]
    fn test_centered_near_edge_is_clamped() {
        let v = Viewport::centered_on(0, MapPoint::new(10, 500), 128, 148, MAP);
        assert_eq!(v.origin, MapPoint::new(0, 364));
    }

    #[test]
    fn test_small_map_pins_origin() {
        let v = Viewport::centered_on(0, MapPoint::new(50, 50), 128, 148, (100, 100));
        assert_eq!(v.origin, MapPoint::new(0, 0));
    }

    #[test]
    fn test_scrolled_stops_at_edge() {
        let v = Viewport::centered_on(0, MapPoint::new(64, 300), 128, 148, MAP);
        assert_eq!(v.origin.x, 0);
        assert_eq!(v.scrolled(-32, 0, MAP).origin, v.origin);
        assert_eq!(v.scrolled(32, 0, MAP).origin.x, 32);
    }

    #[test]
    fn test_screen_map_round_trip() {
        let v = Viewport::centered_on(0, MapPoint::new(256, 256), 128, 148, MAP);
        let screen = ScreenPoint::new(5, 60);
        assert_eq!(v.to_screen(v.to_map(screen)), screen);
        assert_eq!(v.to_map(screen), MapPoint::new(197, 242));
    }

    #[test]
    fn test_to_screen_saturates_far_points() {
        let mut v = Viewport::new(0, 128, 148);
        v.move_to(MapPoint::new(30_000, 30_000), (65_536, 65_536));
        assert_eq!(
            v.to_screen(MapPoint::new(i32::MIN, i32::MAX)),
            ScreenPoint::new(i32::MIN, i32::MAX - 30_000)
        );
        assert_eq!(
            v.to_map(ScreenPoint::new(i32::MAX, 0)),
            MapPoint::new(i32::MAX, 30_000)
        );
    }

    #[test]
    fn test_clamp_point() {
        let v = Viewport::centered_on(0, MapPoint::new(256, 256), 128, 148, MAP);
        assert_eq!(
            v.clamp_point(MapPoint::new(0, 1000), MAP),
            MapPoint::new(192, 329)
        );
        let small = Viewport::new(0, 128, 148);
        assert_eq!(
            small.clamp_point(MapPoint::new(200, 200), (100, 100)),
            MapPoint::new(99, 99)
        );
    }
}
