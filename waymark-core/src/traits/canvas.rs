//! Drawing surface traits

use crate::nav::Viewport;

/// Errors reported by a drawing surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Bus transfer to the panel failed
    Communication,
    /// Coordinates outside the panel
    OutOfBounds,
}

/// Pixel position on the panel, origin top left
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScreenPoint {
    pub x: i32,
    pub y: i32,
}

impl ScreenPoint {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Colors the navigation UI uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Color {
    Black,
    White,
    Red,
    Green,
    Blue,
    Magenta,
    Yellow,
}

/// Primitive drawing operations
pub trait Canvas {
    /// Draw a one-pixel line between two points, inclusive
    fn draw_line(
        &mut self,
        from: ScreenPoint,
        to: ScreenPoint,
        color: Color,
    ) -> Result<(), DisplayError>;

    /// Fill a rectangle
    fn fill_rect(
        &mut self,
        origin: ScreenPoint,
        width: u32,
        height: u32,
        color: Color,
    ) -> Result<(), DisplayError>;

    /// Draw text with its top-left corner at `origin`
    fn draw_text(&mut self, origin: ScreenPoint, text: &str, color: Color)
        -> Result<(), DisplayError>;
}

/// A canvas that can also paint map imagery
///
/// Tile storage and decoding live behind this trait.
pub trait MapScreen: Canvas {
    /// Paint the visible part of the map for `viewport`
    fn draw_map_window(&mut self, viewport: &Viewport) -> Result<(), DisplayError>;

    /// Draw the cursor marker centered on `at`
    fn draw_cursor(&mut self, at: ScreenPoint) -> Result<(), DisplayError>;

    /// Restore the map pixels under a cursor previously drawn at `at`
    fn erase_cursor(&mut self, at: ScreenPoint, viewport: &Viewport) -> Result<(), DisplayError>;
}

impl<T: Canvas + ?Sized> Canvas for &mut T {
    fn draw_line(
        &mut self,
        from: ScreenPoint,
        to: ScreenPoint,
        color: Color,
    ) -> Result<(), DisplayError> {
        (**self).draw_line(from, to, color)
    }

    fn fill_rect(
        &mut self,
        origin: ScreenPoint,
        width: u32,
        height: u32,
        color: Color,
    ) -> Result<(), DisplayError> {
        (**self).fill_rect(origin, width, height, color)
    }

    fn draw_text(
        &mut self,
        origin: ScreenPoint,
        text: &str,
        color: Color,
    ) -> Result<(), DisplayError> {
        (**self).draw_text(origin, text, color)
    }
}

impl<T: MapScreen + ?Sized> MapScreen for &mut T {
    fn draw_map_window(&mut self, viewport: &Viewport) -> Result<(), DisplayError> {
        (**self).draw_map_window(viewport)
    }

    fn draw_cursor(&mut self, at: ScreenPoint) -> Result<(), DisplayError> {
        (**self).draw_cursor(at)
    }

    fn erase_cursor(&mut self, at: ScreenPoint, viewport: &Viewport) -> Result<(), DisplayError> {
        (**self).erase_cursor(at, viewport)
    }
}
