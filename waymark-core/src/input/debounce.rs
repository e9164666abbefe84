//! Edge acceptance with a minimum spacing
//!
//! Both the joystick button and the zoom buttons use the same rule: an
//! edge is accepted when none was accepted before, or when the last
//! accepted one is more than `window_ms` old.
//!
//! A timestamp earlier than the last accepted one means the millisecond
//! counter wrapped. The stamp is then restarted at `now` and that edge is
//! dropped, so one edge at most is lost per wrap.

/// Decide whether an edge at `now` passes the debounce window
///
/// Updates `last` to `now` when the edge is accepted or the clock wrapped.
pub fn accept_edge(last: &mut Option<u32>, now: u32, window_ms: u32) -> bool {
    match *last {
        None => {
            *last = Some(now);
            true
        }
        Some(prev) if now < prev => {
            *last = Some(now);
            false
        }
        Some(prev) if now - prev > window_ms => {
            *last = Some(now);
            true
        }
        Some(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_first_edge_accepted() {
        let mut last = None;
        assert!(accept_edge(&mut last, 0, 500));
        assert_eq!(last, Some(0));
    }

    #[test]
    fn test_edge_inside_window_rejected() {
        let mut last = Some(1000);
        assert!(!accept_edge(&mut last, 1400, 500));
        assert!(!accept_edge(&mut last, 1500, 500));
        assert_eq!(last, Some(1000));
        assert!(accept_edge(&mut last, 1501, 500));
        assert_eq!(last, Some(1501));
    }

    #[test]
    fn test_wraparound_restarts_window() {
        let mut last = Some(u32::MAX - 10);
        assert!(!accept_edge(&mut last, 5, 500));
        assert_eq!(last, Some(5));
        assert!(accept_edge(&mut last, 506, 500));
    }

    proptest! {
        #[test]
        fn prop_accepted_edges_are_spaced(
            steps in proptest::collection::vec(0u32..1200, 1..64),
            window in 1u32..1000,
        ) {
            let mut last = None;
            let mut now = 0u32;
            let mut previous_accept: Option<u32> = None;
            for step in steps {
                now += step;
                if accept_edge(&mut last, now, window) {
                    if let Some(prev) = previous_accept {
                        prop_assert!(now - prev > window);
                    }
                    previous_accept = Some(now);
                }
            }
        }
    }
}
