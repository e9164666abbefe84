//! Line assembly from a serial byte stream
//!
//! Terminators are `\r`, `\n` and NUL, and are stripped. A `\n` that
//! directly follows a `\r` is swallowed so that CRLF ends a single line
//! rather than producing an extra empty one.
//!
//! The receive buffer holds [`LINE_BUFFER_SIZE`] bytes including the
//! terminator. When a line grows past [`MAX_LINE_LEN`] content bytes the
//! reader hands out what it has as one line and keeps going; the rest of the
//! physical line arrives as further chunks. Peers must keep lines shorter
//! than this limit. Every line this protocol defines is far shorter.

use heapless::Vec;

use crate::ProtocolError;

/// Receive buffer size, terminator included
pub const LINE_BUFFER_SIZE: usize = 128;

/// Longest line content delivered in one piece
pub const MAX_LINE_LEN: usize = LINE_BUFFER_SIZE - 1;

/// Byte-at-a-time line assembler
#[derive(Debug, Clone)]
pub struct LineReader {
    buffer: Vec<u8, MAX_LINE_LEN>,
    /// Last byte was `\r`; a following `\n` belongs to the same terminator
    after_cr: bool,
    /// Set once a line has been handed out; cleared on the next byte
    emitted: bool,
}

impl Default for LineReader {
    fn default() -> Self {
        Self::new()
    }
}

impl LineReader {
    /// Create an empty reader
    pub const fn new() -> Self {
        Self {
            buffer: Vec::new(),
            after_cr: false,
            emitted: false,
        }
    }

    /// Drop any partial line
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.after_cr = false;
        self.emitted = false;
    }

    /// Number of bytes waiting for a terminator
    #[cfg(test)]
    fn pending(&self) -> usize {
        if self.emitted {
            0
        } else {
            self.buffer.len()
        }
    }

    /// Feed one byte
    ///
    /// Returns the completed line content when `byte` finishes a line or
    /// fills the buffer. The returned slice is valid until the next call.
    pub fn feed(&mut self, byte: u8) -> Option<&[u8]> {
        if self.emitted {
            self.buffer.clear();
            self.emitted = false;
        }

        let after_cr = core::mem::replace(&mut self.after_cr, byte == b'\r');

        match byte {
            b'\n' if after_cr => None,
            b'\r' | b'\n' | 0 => {
                self.emitted = true;
                Some(self.buffer.as_slice())
            }
            _ => {
                // Capacity is checked below, so this push cannot fail
                let _ = self.buffer.push(byte);
                if self.buffer.is_full() {
                    self.emitted = true;
                    Some(self.buffer.as_slice())
                } else {
                    None
                }
            }
        }
    }

    /// Feed one byte and decode a completed line as UTF-8
    pub fn feed_str(&mut self, byte: u8) -> Option<Result<&str, ProtocolError>> {
        self.feed(byte)
            .map(|line| core::str::from_utf8(line).map_err(|_| ProtocolError::InvalidUtf8))
    }
}
