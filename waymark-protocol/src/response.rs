//! Route responses (server → device)
//!
//! The server answers the stop point with a count line `N` followed by
//! `2N` value lines: latitude then longitude for each route point, in
//! route order. `N = 0` means no route was found.

use crate::number::{parse_count, parse_int};
use crate::point::GeoPoint;
use crate::ProtocolError;

/// Progress reported while a response is parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResponseEvent {
    /// Point count announced; storage for this many points is needed
    Count(usize),
    /// Next route point, in order
    Point(GeoPoint),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    /// Waiting for the count line
    AwaitingCount,
    /// Waiting for a latitude line
    AwaitingLat { remaining: usize },
    /// Got latitude, waiting for the matching longitude
    AwaitingLon { lat: i32, remaining: usize },
    /// All announced points received
    Complete,
}

/// Line-at-a-time response parser
#[derive(Debug, Clone)]
pub struct ResponseParser {
    state: ParseState,
}

impl Default for ResponseParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseParser {
    /// Create a parser waiting for the count line
    pub const fn new() -> Self {
        Self {
            state: ParseState::AwaitingCount,
        }
    }

    /// Check whether every announced point has been received
    pub fn is_complete(&self) -> bool {
        self.state == ParseState::Complete
    }

    /// Feed one line
    ///
    /// Returns `Ok(Some(event))` when the line completed a count or a point,
    /// `Ok(None)` after a latitude line. A parse error leaves the parser
    /// where it was; callers abandon the response.
    pub fn feed_line(&mut self, line: &str) -> Result<Option<ResponseEvent>, ProtocolError> {
        match self.state {
            ParseState::AwaitingCount => {
                let count = parse_count(line)?;
                self.state = Self::next_point(count);
                Ok(Some(ResponseEvent::Count(count)))
            }
            ParseState::AwaitingLat { remaining } => {
                let lat = parse_int(line)?;
                self.state = ParseState::AwaitingLon { lat, remaining };
                Ok(None)
            }
            ParseState::AwaitingLon { lat, remaining } => {
                let lon = parse_int(line)?;
                self.state = Self::next_point(remaining - 1);
                Ok(Some(ResponseEvent::Point(GeoPoint { lat, lon })))
            }
            ParseState::Complete => Err(ProtocolError::UnexpectedLine),
        }
    }

    fn next_point(remaining: usize) -> ParseState {
        if remaining == 0 {
            ParseState::Complete
        } else {
            ParseState::AwaitingLat { remaining }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line::LineReader;

    use std::vec::Vec;

    fn parse_all(input: &[u8]) -> Result<(usize, Vec<GeoPoint>, bool), ProtocolError> {
        let mut reader = LineReader::new();
        let mut parser = ResponseParser::new();
        let mut count = 0;
        let mut points = Vec::new();
        for &b in input {
            if let Some(line) = reader.feed_str(b) {
                match parser.feed_line(line?)? {
                    Some(ResponseEvent::Count(n)) => count = n,
                    Some(ResponseEvent::Point(p)) => points.push(p),
                    None => {}
                }
            }
        }
        Ok((count, points, parser.is_complete()))
    }

    #[test]
    fn test_two_point_response() {
        let (count, points, complete) = parse_all(b"2\n10\n20\n30\n40\n").unwrap();
        assert_eq!(count, 2);
        assert_eq!(points, [GeoPoint::new(10, 20), GeoPoint::new(30, 40)]);
        assert!(complete);
    }

    #[test]
    fn test_empty_route() {
        let (count, points, complete) = parse_all(b"0\n").unwrap();
        assert_eq!(count, 0);
        assert!(points.is_empty());
        assert!(complete);
    }

    #[test]
    fn test_incomplete_response() {
        let (_, points, complete) = parse_all(b"2\n10\n20\n30\n").unwrap();
        assert_eq!(points.len(), 1);
        assert!(!complete);
    }

    #[test]
    fn test_zero_coordinates_accepted() {
        let (_, points, _) = parse_all(b"1\r\n0\r\n0\r\n").unwrap();
        assert_eq!(points, [GeoPoint::new(0, 0)]);
    }

    #[test]
    fn test_bad_value_is_error() {
        assert_eq!(
            parse_all(b"1\n5361858\nnope\n"),
            Err(ProtocolError::InvalidInteger)
        );
    }

    #[test]
    fn test_negative_count_is_error() {
        assert_eq!(parse_all(b"-2\n"), Err(ProtocolError::InvalidCount));
    }

    #[test]
    fn test_extra_line_after_complete() {
        let mut parser = ResponseParser::new();
        parser.feed_line("0").unwrap();
        assert_eq!(parser.feed_line("1"), Err(ProtocolError::UnexpectedLine));
    }
}
