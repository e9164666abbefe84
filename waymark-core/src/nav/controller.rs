//! Navigation controller
//!
//! Owns the cursor, the viewport, the selection state and the current
//! route. The main loop feeds it one [`TickInput`] per iteration and then
//! lets it paint whatever changed:
//!
//! ```text
//!  tick(input, routes)
//!    1. pending zoom  ──► change level, recenter on cursor     ─► Full
//!    2. stick moved   ──► cursor in margin? scroll window      ─► Full
//!                         otherwise move cursor                ─► Cursor
//!    3. select press  ──► advance selection; on the stop point
//!                         drop old route, request new one      ─► Full
//!  render(screen)
//!    Full:   map window, route, cursor, status (forced)
//!    Cursor: erase old cursor, route, cursor, status (if changed)
//! ```
//!
//! The route request blocks; ticks are not run while it is in flight.

use waymark_hal::time::has_expired;
use waymark_protocol::GeoPoint;

use super::selection::SelectionState;
use super::viewport::Viewport;
use crate::config::{NavConfig, ScreenConfig};
use crate::input::JoystickSample;
use crate::render::{PathRenderer, StatusBar};
use crate::route::{Route, RouteService};
use crate::traits::{DisplayError, MapPoint, MapScreen, Projection, ScreenPoint};

/// Notice shown when the server answers with zero points
const NO_ROUTE: &str = "NO ROUTE";

/// Everything the controller consumes in one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickInput {
    pub sample: JoystickSample,
    /// Level requested by the zoom buttons, if it differs from the shown one
    pub zoom: Option<u8>,
    pub now_ms: u32,
}

/// Pending screen work, ordered by cost
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Redraw {
    None,
    /// Cursor moved on an unchanged map window
    Cursor,
    /// Map window, route and cursor
    Full,
}

/// Failure or empty-route message shown instead of the prompt
#[derive(Debug, Clone, Copy)]
struct Notice {
    text: &'static str,
    /// Set on the first tick after the notice was raised
    since: Option<u32>,
}

pub struct NavigationController<P> {
    projection: P,
    screen: ScreenConfig,
    notice_hold_ms: u32,
    viewport: Viewport,
    cursor: MapPoint,
    drawn_cursor: Option<ScreenPoint>,
    selection: SelectionState,
    route: Route,
    status: StatusBar,
    notice: Option<Notice>,
    redraw: Redraw,
}

impl<P: Projection> NavigationController<P> {
    /// Start at the configured level with the cursor in the middle of the map
    pub fn new(projection: P, config: &NavConfig) -> Self {
        let screen = config.screen;
        let level = config.zoom.initial_level.min(projection.max_level());
        let (map_w, map_h) = projection.map_size(level);
        let center = MapPoint::new((map_w / 2) as i32, (map_h / 2) as i32);
        let viewport = Viewport::centered_on(
            level,
            center,
            u32::from(screen.width),
            u32::from(screen.map_height),
            (map_w, map_h),
        );
        let cursor = viewport.clamp_point(center, (map_w, map_h));

        Self {
            projection,
            screen,
            notice_hold_ms: config.route.status_hold_ms,
            viewport,
            cursor,
            drawn_cursor: None,
            selection: SelectionState::AwaitingStart,
            route: Route::new(),
            status: StatusBar::new(&screen),
            notice: None,
            redraw: Redraw::Full,
        }
    }

    /// Run one iteration of the navigation logic
    ///
    /// Returns the redraw now pending.
    pub fn tick<R>(&mut self, input: TickInput, routes: &mut R) -> Redraw
    where
        R: RouteService + ?Sized,
    {
        self.age_notice(input.now_ms);

        if let Some(level) = input.zoom {
            self.set_level(level);
        }
        if input.sample.is_moving() {
            self.steer(input.sample.dx, input.sample.dy);
        }
        if input.sample.select {
            self.select(routes);
        }
        self.redraw
    }

    /// Paint pending changes
    ///
    /// On failure the next call repaints everything.
    pub fn render<S>(&mut self, screen: &mut S) -> Result<(), DisplayError>
    where
        S: MapScreen + ?Sized,
    {
        let pending = core::mem::replace(&mut self.redraw, Redraw::None);
        let result = self.paint(screen, pending);
        if result.is_err() {
            self.redraw = Redraw::Full;
        }
        result
    }

    fn paint<S>(&mut self, screen: &mut S, pending: Redraw) -> Result<(), DisplayError>
    where
        S: MapScreen + ?Sized,
    {
        match pending {
            Redraw::None => {}
            Redraw::Cursor => {
                if let Some(old) = self.drawn_cursor.take() {
                    screen.erase_cursor(old, &self.viewport)?;
                }
                self.draw_overlay(screen)?;
            }
            Redraw::Full => {
                self.drawn_cursor = None;
                screen.draw_map_window(&self.viewport)?;
                self.status.invalidate();
                self.draw_overlay(screen)?;
            }
        }
        let message = self.status_text();
        self.status.show(screen, message)?;
        Ok(())
    }

    fn draw_overlay<S>(&mut self, screen: &mut S) -> Result<(), DisplayError>
    where
        S: MapScreen + ?Sized,
    {
        PathRenderer::draw(&self.route, &self.viewport, &self.projection, screen)?;
        let at = self.cursor_screen();
        screen.draw_cursor(at)?;
        self.drawn_cursor = Some(at);
        Ok(())
    }

    /// Switch zoom level, keeping the cursor on the same geographic point
    fn set_level(&mut self, level: u8) {
        let level = level.min(self.projection.max_level());
        let old_level = self.viewport.level;
        if level == old_level {
            return;
        }

        let geo = self.projection.to_geo(old_level, self.cursor);
        let map_size = self.projection.map_size(level);
        let target = self.projection.to_map(level, geo);
        self.viewport = Viewport::centered_on(
            level,
            target,
            self.viewport.width,
            self.viewport.height,
            map_size,
        );
        self.cursor = self.viewport.clamp_point(target, map_size);
        log_debug!("zoom {} -> {}", old_level, level);
        self.request_redraw(Redraw::Full);
    }

    /// Scroll when the cursor sits in a margin, otherwise move it
    fn steer(&mut self, dx: i32, dy: i32) {
        let at = self.cursor_screen();
        let step = self.screen.scroll_step;
        let scroll_x = if at.x < self.screen.left_margin {
            -step
        } else if at.x > self.screen.right_margin {
            step
        } else {
            0
        };
        let scroll_y = if at.y < self.screen.top_margin {
            -step
        } else if at.y > self.screen.bottom_margin {
            step
        } else {
            0
        };

        let map_size = self.map_size();
        if scroll_x != 0 || scroll_y != 0 {
            let scrolled = self.viewport.scrolled(scroll_x, scroll_y, map_size);
            // At the map edge the window cannot move; let the cursor go on
            if scrolled.origin != self.viewport.origin {
                self.viewport = scrolled;
                self.cursor = self.viewport.clamp_point(self.cursor, map_size);
                self.request_redraw(Redraw::Full);
                return;
            }
        }

        let moved = self
            .viewport
            .clamp_point(MapPoint::new(self.cursor.x + dx, self.cursor.y + dy), map_size);
        if moved != self.cursor {
            self.cursor = moved;
            self.request_redraw(Redraw::Cursor);
        }
    }

    fn select<R>(&mut self, routes: &mut R)
    where
        R: RouteService + ?Sized,
    {
        let point = self.cursor_geo();
        let (next, request) = self.selection.advance(point);
        self.selection = next;
        self.notice = None;

        let Some(request) = request else {
            log_info!("start selected: {}, {}", point.lat, point.lon);
            return;
        };

        log_info!("stop selected: {}, {}", point.lat, point.lon);
        self.route.clear();
        self.request_redraw(Redraw::Full);
        match routes.request_route(request.start, request.stop) {
            Ok(route) => {
                if route.is_empty() {
                    self.raise_notice(NO_ROUTE);
                }
                self.route = route;
            }
            Err(err) => self.raise_notice(err.notice()),
        }
    }

    fn raise_notice(&mut self, text: &'static str) {
        self.notice = Some(Notice { text, since: None });
    }

    /// Start or expire the notice hold
    ///
    /// The hold starts on the first tick after the notice was raised, since
    /// the request that raised it may have blocked for seconds.
    fn age_notice(&mut self, now_ms: u32) {
        let Some(notice) = self.notice.as_mut() else {
            return;
        };
        let Some(since) = notice.since else {
            notice.since = Some(now_ms);
            return;
        };
        if has_expired(now_ms, since, self.notice_hold_ms) {
            self.notice = None;
        }
    }

    fn request_redraw(&mut self, redraw: Redraw) {
        self.redraw = self.redraw.max(redraw);
    }

    fn map_size(&self) -> (u32, u32) {
        self.projection.map_size(self.viewport.level)
    }

    /// Place the cursor at a screen position, clamped to window and map
    pub fn move_cursor_to_screen(&mut self, at: ScreenPoint) {
        let map_size = self.map_size();
        let target = self.viewport.clamp_point(self.viewport.to_map(at), map_size);
        if target != self.cursor {
            self.cursor = target;
            self.request_redraw(Redraw::Cursor);
        }
    }

    /// Move the window so its top-left corner shows `origin`
    ///
    /// The cursor keeps its map position when it stays visible and is
    /// pulled inside the window otherwise.
    pub fn move_window_to(&mut self, origin: MapPoint) {
        let map_size = self.map_size();
        self.viewport.move_to(origin, map_size);
        self.cursor = self.viewport.clamp_point(self.cursor, map_size);
        self.request_redraw(Redraw::Full);
    }

    /// Text the status strip should show
    pub fn status_text(&self) -> &'static str {
        match self.notice {
            Some(notice) => notice.text,
            None => self.selection.prompt(),
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn level(&self) -> u8 {
        self.viewport.level
    }

    /// Cursor position in map pixels at the current level
    pub fn cursor(&self) -> MapPoint {
        self.cursor
    }

    pub fn cursor_screen(&self) -> ScreenPoint {
        self.viewport.to_screen(self.cursor)
    }

    pub fn cursor_geo(&self) -> GeoPoint {
        self.projection.to_geo(self.viewport.level, self.cursor)
    }

    pub fn selection(&self) -> SelectionState {
        self.selection
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn pending_redraw(&self) -> Redraw {
        self.redraw
    }

    pub fn projection(&self) -> &P {
        &self.projection
    }
}
