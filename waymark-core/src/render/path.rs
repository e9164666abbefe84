//! Route polyline
//!
//! Segments are clipped to the viewport before they reach the canvas, so a
//! route point far outside the map costs no more than one on screen.

use crate::nav::Viewport;
use crate::route::Route;
use crate::traits::{Canvas, Color, DisplayError, MapPoint, Projection, ScreenPoint};

/// Color of route segments
pub const ROUTE_COLOR: Color = Color::Red;

// Outcode bits
const INSIDE: u8 = 0;
const LEFT: u8 = 1;
const RIGHT: u8 = 2;
const TOP: u8 = 4;
const BOTTOM: u8 = 8;

/// Clip steps before the endpoints are clamped
///
/// Each step puts one endpoint on an edge; rounding can leave it a pixel off.
const CLIP_STEPS: usize = 8;

/// Draws a route as connected line segments
pub struct PathRenderer;

impl PathRenderer {
    /// Draw every visible segment of `route` as seen through `viewport`
    ///
    /// Segments wholly off screen are skipped. Only the canvas is touched.
    pub fn draw<P, C>(
        route: &Route,
        viewport: &Viewport,
        projection: &P,
        canvas: &mut C,
    ) -> Result<(), DisplayError>
    where
        P: Projection + ?Sized,
        C: Canvas + ?Sized,
    {
        for (from, to) in route.segments() {
            let from = projection.to_map(viewport.level, from);
            let to = projection.to_map(viewport.level, to);
            if let Some((from, to)) = clip_segment(viewport, from, to) {
                canvas.draw_line(from, to, ROUTE_COLOR)?;
            }
        }
        Ok(())
    }
}

/// Window-relative point, wide enough for any pair of map pixels
type Local = (i64, i64);

/// Cohen-Sutherland clip of a map segment to the visible window
fn clip_segment(
    viewport: &Viewport,
    from: MapPoint,
    to: MapPoint,
) -> Option<(ScreenPoint, ScreenPoint)> {
    if viewport.width == 0 || viewport.height == 0 {
        return None;
    }
    let right = i64::from(viewport.width) - 1;
    let bottom = i64::from(viewport.height) - 1;
    let local = |p: MapPoint| -> Local {
        (
            i64::from(p.x) - i64::from(viewport.origin.x),
            i64::from(p.y) - i64::from(viewport.origin.y),
        )
    };

    let (mut a, mut b) = (local(from), local(to));
    for _ in 0..CLIP_STEPS {
        let code_a = outcode(a, right, bottom);
        let code_b = outcode(b, right, bottom);
        if code_a | code_b == INSIDE {
            break;
        }
        if code_a & code_b != INSIDE {
            return None;
        }
        if code_a != INSIDE {
            a = onto_edge(a, b, code_a, right, bottom);
        } else {
            b = onto_edge(b, a, code_b, right, bottom);
        }
    }

    let clamp = |p: Local| {
        ScreenPoint::new(p.0.clamp(0, right) as i32, p.1.clamp(0, bottom) as i32)
    };
    Some((clamp(a), clamp(b)))
}

fn outcode(p: Local, right: i64, bottom: i64) -> u8 {
    let mut code = INSIDE;
    if p.0 < 0 {
        code |= LEFT;
    } else if p.0 > right {
        code |= RIGHT;
    }
    if p.1 < 0 {
        code |= TOP;
    } else if p.1 > bottom {
        code |= BOTTOM;
    }
    code
}

/// Move `p` along the line to `q` onto the first edge named in `code`
///
/// `q` is on the inner side of that edge, so the line is not parallel to it.
fn onto_edge(p: Local, q: Local, code: u8, right: i64, bottom: i64) -> Local {
    let (dx, dy) = (i128::from(q.0 - p.0), i128::from(q.1 - p.1));
    let at_y = |y: i64| -> Local {
        let x = i128::from(p.0) + dx * i128::from(y - p.1) / dy;
        (x as i64, y)
    };
    let at_x = |x: i64| -> Local {
        let y = i128::from(p.1) + dy * i128::from(x - p.0) / dx;
        (x, y as i64)
    };

    if code & TOP != 0 {
        at_y(0)
    } else if code & BOTTOM != 0 {
        at_y(bottom)
    } else if code & RIGHT != 0 {
        at_x(right)
    } else {
        at_x(0)
    }
}
