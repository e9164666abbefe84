//! Recording screen for unit tests

use std::string::String;
use std::vec::Vec;

use crate::nav::Viewport;
use crate::traits::{Canvas, Color, DisplayError, MapScreen, ScreenPoint};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawCall {
    Line(ScreenPoint, ScreenPoint, Color),
    Rect(ScreenPoint, u32, u32, Color),
    Text(ScreenPoint, String, Color),
    Map(Viewport),
    Cursor(ScreenPoint),
    EraseCursor(ScreenPoint),
}

#[derive(Debug, Default)]
pub struct RecordingScreen {
    pub calls: Vec<DrawCall>,
    pub fail: bool,
}

impl RecordingScreen {
    pub fn failing() -> Self {
        Self {
            calls: Vec::new(),
            fail: true,
        }
    }

    fn record(&mut self, call: DrawCall) -> Result<(), DisplayError> {
        if self.fail {
            return Err(DisplayError::Communication);
        }
        self.calls.push(call);
        Ok(())
    }

    pub fn count(&self, matches: impl Fn(&DrawCall) -> bool) -> usize {
        self.calls.iter().filter(|call| matches(call)).count()
    }
}

impl Canvas for RecordingScreen {
    fn draw_line(
        &mut self,
        from: ScreenPoint,
        to: ScreenPoint,
        color: Color,
    ) -> Result<(), DisplayError> {
        self.record(DrawCall::Line(from, to, color))
    }

    fn fill_rect(
        &mut self,
        origin: ScreenPoint,
        width: u32,
        height: u32,
        color: Color,
    ) -> Result<(), DisplayError> {
        self.record(DrawCall::Rect(origin, width, height, color))
    }

    fn draw_text(
        &mut self,
        origin: ScreenPoint,
        text: &str,
        color: Color,
    ) -> Result<(), DisplayError> {
        self.record(DrawCall::Text(origin, text.into(), color))
    }
}

impl MapScreen for RecordingScreen {
    fn draw_map_window(&mut self, viewport: &Viewport) -> Result<(), DisplayError> {
        self.record(DrawCall::Map(*viewport))
    }

    fn draw_cursor(&mut self, at: ScreenPoint) -> Result<(), DisplayError> {
        self.record(DrawCall::Cursor(at))
    }

    fn erase_cursor(&mut self, at: ScreenPoint, _viewport: &Viewport) -> Result<(), DisplayError> {
        self.record(DrawCall::EraseCursor(at))
    }
}
