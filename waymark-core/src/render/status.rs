//! Status strip below the map
//!
//! A green strip with a short magenta message. The strip is repainted only
//! when the message changes.

use crate::config::ScreenConfig;
use crate::traits::{Canvas, Color, DisplayError, ScreenPoint};

const BACKGROUND: Color = Color::Green;
const FOREGROUND: Color = Color::Magenta;
/// Text baseline offset inside the strip
const TEXT_INSET: i32 = 2;

/// One-line status message area
#[derive(Debug, Clone)]
pub struct StatusBar {
    top: i32,
    width: u32,
    height: u32,
    shown: Option<&'static str>,
}

impl StatusBar {
    pub fn new(screen: &ScreenConfig) -> Self {
        Self {
            top: screen.status_y(),
            width: u32::from(screen.width),
            height: u32::from(screen.status_height),
            shown: None,
        }
    }

    /// Paint `message` unless it is already on screen
    ///
    /// Returns whether the strip was repainted.
    pub fn show<C: Canvas + ?Sized>(
        &mut self,
        canvas: &mut C,
        message: &'static str,
    ) -> Result<bool, DisplayError> {
        if self.shown == Some(message) {
            return Ok(false);
        }
        canvas.fill_rect(ScreenPoint::new(0, self.top), self.width, self.height, BACKGROUND)?;
        canvas.draw_text(ScreenPoint::new(0, self.top + TEXT_INSET), message, FOREGROUND)?;
        self.shown = Some(message);
        Ok(true)
    }

    /// Force the next [`StatusBar::show`] to repaint
    pub fn invalidate(&mut self) {
        self.shown = None;
    }

    /// Message currently on screen
    #[cfg(test)]
    fn shown(&self) -> Option<&'static str> {
        self.shown
    }
}
