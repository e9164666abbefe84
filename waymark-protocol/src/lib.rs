//! Waymark Route Protocol
//!
//! This crate defines the text protocol spoken between the navigation device
//! and the remote path server over a plain serial link. The protocol is
//! line-oriented so it can be driven from a terminal or a Python script.
//!
//! # Protocol Overview
//!
//! ```text
//! device → server   "<lon>, <lat>"      start point
//! device → server   "<lon>, <lat>"      stop point
//! server → device   "<N>"               number of route points
//! server → device   "<lat0>"            \
//! server → device   "<lon0>"             | 2N lines, one integer each
//! server → device   ...                 /
//! ```
//!
//! Lines end in `\r`, `\n` or NUL. A line may hold at most
//! [`MAX_LINE_LEN`] bytes of content; longer lines are delivered as
//! several chunks (see [`line::LineReader`]).

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod line;
pub mod number;
pub mod point;
pub mod request;
pub mod response;

pub use line::{LineReader, LINE_BUFFER_SIZE, MAX_LINE_LEN};
pub use number::parse_int;
pub use point::GeoPoint;
pub use request::{parse_request_line, PathRequest, RequestLine};
pub use response::{ResponseEvent, ResponseParser};

/// Errors raised while encoding or decoding protocol lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProtocolError {
    /// Line did not hold a base-10 integer
    InvalidInteger,
    /// Integer did not fit in 32 bits
    OutOfRange,
    /// Route point count was negative
    InvalidCount,
    /// Line held bytes that are not UTF-8
    InvalidUtf8,
    /// Output buffer too small for an encoded line
    BufferTooSmall,
    /// A line arrived after the response was complete
    UnexpectedLine,
}
