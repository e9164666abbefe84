//! Path requests (device → server)
//!
//! A request is two lines, start point first, each carrying longitude then
//! latitude separated by `", "`. Lines are sent with a CRLF terminator.

use core::fmt::Write;

use heapless::String;

use crate::line::MAX_LINE_LEN;
use crate::number::parse_int;
use crate::point::GeoPoint;
use crate::ProtocolError;

/// Line terminator used for outgoing lines
pub const LINE_TERMINATOR: &str = "\r\n";

/// One encoded request line, without terminator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    text: String<MAX_LINE_LEN>,
}

impl RequestLine {
    /// Encode a point as `"<lon>, <lat>"`
    pub fn new(point: GeoPoint) -> Self {
        let mut text = String::new();
        // Two i32 values and the separator need at most 24 bytes
        let _ = write!(text, "{}, {}", point.lon, point.lat);
        Self { text }
    }

    /// Line content
    pub fn as_str(&self) -> &str {
        self.text.as_str()
    }

    /// Write the line with its terminator into `buffer`
    ///
    /// Returns the number of bytes written.
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, ProtocolError> {
        let body = self.text.as_bytes();
        let term = LINE_TERMINATOR.as_bytes();
        let len = body.len() + term.len();
        if buffer.len() < len {
            return Err(ProtocolError::BufferTooSmall);
        }
        buffer[..body.len()].copy_from_slice(body);
        buffer[body.len()..len].copy_from_slice(term);
        Ok(len)
    }
}

/// Start and stop point of one route request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PathRequest {
    /// Where the route begins
    pub start: GeoPoint,
    /// Where the route ends
    pub stop: GeoPoint,
}

impl PathRequest {
    /// Create a request
    pub const fn new(start: GeoPoint, stop: GeoPoint) -> Self {
        Self { start, stop }
    }

    /// Request lines in transmission order
    pub fn lines(&self) -> [RequestLine; 2] {
        [RequestLine::new(self.start), RequestLine::new(self.stop)]
    }
}

/// Decode a `"<lon>, <lat>"` line
///
/// Splits on the first comma; whitespace around either field is ignored.
pub fn parse_request_line(line: &str) -> Result<GeoPoint, ProtocolError> {
    let (lon, lat) = line.split_once(',').ok_or(ProtocolError::InvalidInteger)?;
    Ok(GeoPoint {
        lat: parse_int(lat)?,
        lon: parse_int(lon)?,
    })
}
