//! Integer fields
//!
//! Every value on the wire is a signed base-10 integer on a line of its own.
//! Surrounding whitespace is ignored. Zero is an ordinary value.

use core::num::IntErrorKind;

use crate::ProtocolError;

/// Parse one integer line
pub fn parse_int(line: &str) -> Result<i32, ProtocolError> {
    line.trim().parse::<i32>().map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => ProtocolError::OutOfRange,
        _ => ProtocolError::InvalidInteger,
    })
}

/// Parse a route point count
///
/// Counts use the same integer format but may not be negative.
pub fn parse_count(line: &str) -> Result<usize, ProtocolError> {
    let count = parse_int(line)?;
    usize::try_from(count).map_err(|_| ProtocolError::InvalidCount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    use std::string::ToString;

    #[test]
    fn test_plain_values() {
        assert_eq!(parse_int("10"), Ok(10));
        assert_eq!(parse_int("-11350000"), Ok(-11350000));
        assert_eq!(parse_int("+7"), Ok(7));
    }

    #[test]
    fn test_zero_is_valid() {
        assert_eq!(parse_int("0"), Ok(0));
        assert_eq!(parse_int("-0"), Ok(0));
    }

    #[test]
    fn test_whitespace_tolerated() {
        assert_eq!(parse_int("  5361858 \t"), Ok(5361858));
    }

    #[test]
    fn test_non_numeric() {
        assert_eq!(parse_int(""), Err(ProtocolError::InvalidInteger));
        assert_eq!(parse_int("abc"), Err(ProtocolError::InvalidInteger));
        assert_eq!(parse_int("12x"), Err(ProtocolError::InvalidInteger));
        assert_eq!(parse_int("1 2"), Err(ProtocolError::InvalidInteger));
    }

    #[test]
    fn test_out_of_range() {
        assert_eq!(parse_int("2147483648"), Err(ProtocolError::OutOfRange));
        assert_eq!(parse_int("-2147483649"), Err(ProtocolError::OutOfRange));
        assert_eq!(parse_int("2147483647"), Ok(i32::MAX));
    }

    #[test]
    fn test_count() {
        assert_eq!(parse_count("3"), Ok(3));
        assert_eq!(parse_count("0"), Ok(0));
        assert_eq!(parse_count("-1"), Err(ProtocolError::InvalidCount));
        assert_eq!(parse_count("x"), Err(ProtocolError::InvalidInteger));
    }

    proptest! {
        #[test]
        fn prop_any_i32_parses(value in any::<i32>()) {
            prop_assert_eq!(parse_int(&value.to_string()), Ok(value));
        }

        #[test]
        fn prop_beyond_i32_is_out_of_range(value in (i32::MAX as i64 + 1)..i64::MAX) {
            prop_assert_eq!(parse_int(&value.to_string()), Err(ProtocolError::OutOfRange));
        }
    }
}
