//! Millisecond time source
//!
//! Timestamps are free-running `u32` millisecond counters that wrap after
//! roughly 49 days. Callers must compare them with the helpers here rather
//! than with plain arithmetic.

/// Monotonic millisecond clock
pub trait Clock {
    /// Milliseconds since boot, wrapping at `u32::MAX`
    fn now_ms(&self) -> u32;
}

impl<T: Clock + ?Sized> Clock for &T {
    fn now_ms(&self) -> u32 {
        (**self).now_ms()
    }
}

/// Milliseconds elapsed from `since` to `now`, tolerant of one wraparound
pub const fn elapsed_ms(now: u32, since: u32) -> u32 {
    now.wrapping_sub(since)
}

/// Check whether `timeout_ms` has passed since `since`
pub const fn has_expired(now: u32, since: u32, timeout_ms: u32) -> bool {
    elapsed_ms(now, since) >= timeout_ms
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elapsed_simple() {
        assert_eq!(elapsed_ms(1500, 1000), 500);
    }

    #[test]
    fn test_elapsed_across_wrap() {
        assert_eq!(elapsed_ms(100, u32::MAX - 99), 200);
    }

    #[test]
    fn test_has_expired() {
        assert!(!has_expired(1499, 1000, 500));
        assert!(has_expired(1500, 1000, 500));
        assert!(has_expired(10, u32::MAX - 600, 500));
    }
}
