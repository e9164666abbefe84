//! Map screen on top of an RGB565 draw target
//!
//! Until map tiles are streamed from the SD card, the map window is a flat
//! water-blue background with a grid every 64 map pixels, so scrolling and
//! zooming stay visible.

use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};

use waymark_core::nav::Viewport;
use waymark_core::traits::{Canvas, Color, DisplayError, MapScreen, ScreenPoint};

/// Map pixels between grid lines
const GRID_SPACING: i32 = 64;

/// Cursor box edge length in pixels
const CURSOR_SIZE: u32 = 5;

const BACKGROUND: Rgb565 = Rgb565::new(2, 12, 24);
const GRID: Rgb565 = Rgb565::new(8, 28, 31);
const CURSOR: Rgb565 = Rgb565::WHITE;

fn rgb(color: Color) -> Rgb565 {
    match color {
        Color::Black => Rgb565::BLACK,
        Color::White => Rgb565::WHITE,
        Color::Red => Rgb565::RED,
        Color::Green => Rgb565::GREEN,
        Color::Blue => Rgb565::BLUE,
        Color::Magenta => Rgb565::MAGENTA,
        Color::Yellow => Rgb565::YELLOW,
    }
}

fn point(at: ScreenPoint) -> Point {
    Point::new(at.x, at.y)
}

/// Map screen over any RGB565 target
pub struct BoardScreen<D> {
    target: D,
    map_area: Rectangle,
}

impl<D> BoardScreen<D>
where
    D: DrawTarget<Color = Rgb565>,
{
    /// `map_width` x `map_height` at the top of the target shows the map
    pub fn new(target: D, map_width: u32, map_height: u32) -> Self {
        Self {
            target,
            map_area: Rectangle::new(Point::zero(), Size::new(map_width, map_height)),
        }
    }

    /// Background and grid for `viewport`, limited to `area`
    fn paint_map(&mut self, viewport: &Viewport, area: Rectangle) -> Result<(), DisplayError> {
        let area = area.intersection(&self.map_area);
        if area.is_zero_sized() {
            return Ok(());
        }

        let mut clipped = self.target.clipped(&area);
        clipped
            .fill_solid(&area, BACKGROUND)
            .map_err(|_| DisplayError::Communication)?;

        let style = PrimitiveStyle::with_stroke(GRID, 1);
        let width = viewport.width as i32;
        let height = viewport.height as i32;

        let mut x = first_grid_line(viewport.origin.x) - viewport.origin.x;
        while x < width {
            Line::new(Point::new(x, 0), Point::new(x, height - 1))
                .into_styled(style)
                .draw(&mut clipped)
                .map_err(|_| DisplayError::Communication)?;
            x += GRID_SPACING;
        }

        let mut y = first_grid_line(viewport.origin.y) - viewport.origin.y;
        while y < height {
            Line::new(Point::new(0, y), Point::new(width - 1, y))
                .into_styled(style)
                .draw(&mut clipped)
                .map_err(|_| DisplayError::Communication)?;
            y += GRID_SPACING;
        }

        Ok(())
    }
}

/// Smallest grid coordinate at or after `origin`
fn first_grid_line(origin: i32) -> i32 {
    let rem = origin.rem_euclid(GRID_SPACING);
    if rem == 0 {
        origin
    } else {
        origin + GRID_SPACING - rem
    }
}

fn cursor_box(at: ScreenPoint) -> Rectangle {
    Rectangle::with_center(point(at), Size::new(CURSOR_SIZE, CURSOR_SIZE))
}

impl<D> Canvas for BoardScreen<D>
where
    D: DrawTarget<Color = Rgb565>,
{
    fn draw_line(
        &mut self,
        from: ScreenPoint,
        to: ScreenPoint,
        color: Color,
    ) -> Result<(), DisplayError> {
        let map_area = self.map_area;
        Line::new(point(from), point(to))
            .into_styled(PrimitiveStyle::with_stroke(rgb(color), 1))
            .draw(&mut self.target.clipped(&map_area))
            .map_err(|_| DisplayError::Communication)
    }

    fn fill_rect(
        &mut self,
        origin: ScreenPoint,
        width: u32,
        height: u32,
        color: Color,
    ) -> Result<(), DisplayError> {
        self.target
            .fill_solid(&Rectangle::new(point(origin), Size::new(width, height)), rgb(color))
            .map_err(|_| DisplayError::Communication)
    }

    fn draw_text(&mut self, origin: ScreenPoint, text: &str, color: Color) -> Result<(), DisplayError> {
        let style = MonoTextStyle::new(&FONT_6X10, rgb(color));
        Text::with_baseline(text, point(origin), style, Baseline::Top)
            .draw(&mut self.target)
            .map(|_| ())
            .map_err(|_| DisplayError::Communication)
    }
}

impl<D> MapScreen for BoardScreen<D>
where
    D: DrawTarget<Color = Rgb565>,
{
    fn draw_map_window(&mut self, viewport: &Viewport) -> Result<(), DisplayError> {
        let map_area = self.map_area;
        self.paint_map(viewport, map_area)
    }

    fn draw_cursor(&mut self, at: ScreenPoint) -> Result<(), DisplayError> {
        let map_area = self.map_area;
        cursor_box(at)
            .into_styled(PrimitiveStyle::with_stroke(CURSOR, 1))
            .draw(&mut self.target.clipped(&map_area))
            .map_err(|_| DisplayError::Communication)
    }

    fn erase_cursor(&mut self, at: ScreenPoint, viewport: &Viewport) -> Result<(), DisplayError> {
        self.paint_map(viewport, cursor_box(at))
    }
}
