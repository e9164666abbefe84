//! Zoom request latch
//!
//! The zoom buttons are serviced from interrupt context while the main loop
//! may be blocked in a route request. The latch is the only state the two
//! sides share:
//!
//! ```text
//!  zoom-in edge  ──► on_zoom_in ──┐
//!                                 ├──► requested (AtomicU8) ──► poll ──► loop
//!  zoom-out edge ──► on_zoom_out ─┘
//! ```
//!
//! Each direction debounces on its own stamp. An accepted edge moves the
//! requested level one step with a single read-modify-write, so concurrent
//! edges are never lost or applied twice. The loop reads the slot with one
//! load per tick and applies whatever level it finds.

use portable_atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};

use super::debounce::accept_edge;

/// Zoom button direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ZoomDirection {
    /// Toward more detail (higher level)
    In,
    /// Toward less detail (lower level)
    Out,
}

/// Last accepted edge of one button
///
/// Written only by that button's handler.
struct EdgeStamp {
    seen: AtomicBool,
    at: AtomicU32,
}

impl EdgeStamp {
    const fn new() -> Self {
        Self {
            seen: AtomicBool::new(false),
            at: AtomicU32::new(0),
        }
    }

    fn accept(&self, now_ms: u32, window_ms: u32) -> bool {
        let before = if self.seen.load(Ordering::Acquire) {
            Some(self.at.load(Ordering::Acquire))
        } else {
            None
        };
        let mut last = before;
        let accepted = accept_edge(&mut last, now_ms, window_ms);
        if let Some(at) = last.filter(|_| last != before) {
            self.at.store(at, Ordering::Release);
            self.seen.store(true, Ordering::Release);
        }
        accepted
    }

    fn clear(&self) {
        self.seen.store(false, Ordering::Release);
    }
}

/// Interrupt-safe zoom level request slot
pub struct ZoomLatch {
    requested: AtomicU8,
    max_level: AtomicU8,
    window_ms: AtomicU32,
    zoom_in: EdgeStamp,
    zoom_out: EdgeStamp,
}

impl ZoomLatch {
    /// Create an unconfigured latch at level 0
    ///
    /// `const` so it can live in a `static`.
    pub const fn new() -> Self {
        Self {
            requested: AtomicU8::new(0),
            max_level: AtomicU8::new(0),
            window_ms: AtomicU32::new(500),
            zoom_in: EdgeStamp::new(),
            zoom_out: EdgeStamp::new(),
        }
    }

    /// Set the starting level, the level range and the debounce window
    ///
    /// Called once at boot before the zoom handlers are enabled.
    pub fn configure(&self, level: u8, max_level: u8, debounce_ms: u32) {
        self.max_level.store(max_level, Ordering::Release);
        self.window_ms.store(debounce_ms, Ordering::Release);
        self.requested.store(level.min(max_level), Ordering::Release);
        self.zoom_in.clear();
        self.zoom_out.clear();
    }

    /// Zoom-in button handler; returns whether the requested level moved
    pub fn on_zoom_in(&self, now_ms: u32) -> bool {
        self.on_edge(ZoomDirection::In, now_ms)
    }

    /// Zoom-out button handler; returns whether the requested level moved
    pub fn on_zoom_out(&self, now_ms: u32) -> bool {
        self.on_edge(ZoomDirection::Out, now_ms)
    }

    /// Handle a button edge
    ///
    /// Never blocks. A debounced edge at the end of the level range is
    /// accepted but changes nothing.
    pub fn on_edge(&self, direction: ZoomDirection, now_ms: u32) -> bool {
        let window = self.window_ms.load(Ordering::Acquire);
        let stamp = match direction {
            ZoomDirection::In => &self.zoom_in,
            ZoomDirection::Out => &self.zoom_out,
        };
        if !stamp.accept(now_ms, window) {
            return false;
        }

        let max_level = self.max_level.load(Ordering::Acquire);
        self.requested
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |level| match direction {
                ZoomDirection::In if level < max_level => Some(level + 1),
                ZoomDirection::Out if level > 0 => Some(level - 1),
                _ => None,
            })
            .is_ok()
    }

    /// Level most recently requested by the buttons
    pub fn requested_level(&self) -> u8 {
        self.requested.load(Ordering::Acquire)
    }

    /// Pending level change relative to the level the loop shows
    pub fn poll(&self, current_level: u8) -> Option<u8> {
        let requested = self.requested.load(Ordering::Acquire);
        (requested != current_level).then_some(requested)
    }
}

impl Default for ZoomLatch {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn latch(level: u8, max_level: u8) -> ZoomLatch {
        let latch = ZoomLatch::new();
        latch.configure(level, max_level, 500);
        latch
    }

    #[test]
    fn test_configure_clamps_level() {
        let latch = latch(9, 4);
        assert_eq!(latch.requested_level(), 4);
        assert_eq!(latch.poll(4), None);
    }

    #[test]
    fn test_zoom_in_and_poll() {
        let latch = latch(1, 4);
        assert!(latch.on_zoom_in(1000));
        assert_eq!(latch.poll(1), Some(2));
        // Loop applied level 2
        assert_eq!(latch.poll(2), None);
    }

    #[test]
    fn test_same_direction_debounced() {
        let latch = latch(1, 4);
        assert!(latch.on_zoom_in(1000));
        assert!(!latch.on_zoom_in(1200));
        assert!(!latch.on_zoom_in(1500));
        assert_eq!(latch.requested_level(), 2);
        assert!(latch.on_zoom_in(1501));
        assert_eq!(latch.requested_level(), 3);
    }

    #[test]
    fn test_directions_debounce_independently() {
        let latch = latch(2, 4);
        assert!(latch.on_zoom_in(1000));
        assert!(latch.on_zoom_out(1010));
        assert_eq!(latch.requested_level(), 2);
    }

    #[test]
    fn test_level_range_is_respected() {
        let latch = latch(0, 1);
        assert!(!latch.on_zoom_out(0));
        assert_eq!(latch.requested_level(), 0);
        assert!(latch.on_zoom_in(1000));
        assert!(!latch.on_zoom_in(2000));
        assert_eq!(latch.requested_level(), 1);
    }

    #[test]
    fn test_shared_across_threads() {
        static LATCH: ZoomLatch = ZoomLatch::new();
        LATCH.configure(0, 200, 0);

        std::thread::scope(|s| {
            s.spawn(|| {
                for t in 0..100u32 {
                    LATCH.on_zoom_in(t * 2 + 1);
                }
            });
            s.spawn(|| {
                for t in 0..50u32 {
                    LATCH.on_zoom_out(t * 2 + 1);
                }
            });
        });
        // Steps out at level 0 are dropped, never steps in
        assert!(LATCH.requested_level() <= 100);
        assert!(LATCH.requested_level() >= 50);
    }

    proptest! {
        #[test]
        fn prop_edges_within_window_count_once(
            first in 0u32..1_000_000,
            gaps in proptest::collection::vec(0u32..=500, 1..16),
        ) {
            let latch = latch(0, 7);
            let mut now = first;
            prop_assert!(latch.on_zoom_in(now));
            for gap in gaps {
                now += gap;
                if now - first > 500 {
                    break;
                }
                prop_assert!(!latch.on_zoom_in(now));
            }
            prop_assert_eq!(latch.requested_level(), 1);
        }
    }
}
