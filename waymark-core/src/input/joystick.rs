//! Analog joystick sampling
//!
//! Each axis is read as a 10-bit value and offset against the center
//! captured at boot. Offsets inside the dead zone read as zero; larger
//! offsets are divided down into a per-tick cursor delta that is never
//! zero, so the slightest deliberate push still moves the cursor.
//!
//! ```text
//!  offset  -1023 ... -129 -128 ... -5  -4 ... 4  5 ... 128 129 ... 1023
//!  delta      -7 ...   -1   -1 ... -1   0 ... 0  1 ...   1   1 ...    7
//! ```
//!
//! The select button is active low. A press is reported once, when the
//! release that follows it is sampled.

use waymark_hal::{AnalogInput, InputPin};

use super::debounce::accept_edge;
use crate::config::JoystickConfig;

/// One tick worth of joystick input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct JoystickSample {
    /// Horizontal cursor delta in pixels, positive to the right
    pub dx: i32,
    /// Vertical cursor delta in pixels, positive downward
    pub dy: i32,
    /// A completed press of the select button
    pub select: bool,
}

impl JoystickSample {
    /// Whether the stick is deflected
    pub fn is_moving(&self) -> bool {
        self.dx != 0 || self.dy != 0
    }
}

/// Convert a centered axis offset into a cursor delta
pub fn axis_delta(offset: i32, dead_zone: u16, divisor: u16) -> i32 {
    if offset.unsigned_abs() <= u32::from(dead_zone) {
        return 0;
    }
    let delta = offset / i32::from(divisor.max(1));
    if delta == 0 {
        offset.signum()
    } else {
        delta
    }
}

/// Turns a sampled button level into one event per press/release
#[derive(Debug, Clone)]
pub struct ButtonEdgeDetector {
    interval_ms: u32,
    last_sample: Option<u32>,
    pressed: bool,
}

impl ButtonEdgeDetector {
    pub const fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms,
            last_sample: None,
            pressed: false,
        }
    }

    /// Feed the current level; returns `true` on a completed press
    ///
    /// The level is only looked at when more than the sample interval has
    /// passed since the last sample.
    pub fn update(&mut self, now_ms: u32, pressed: bool) -> bool {
        if !accept_edge(&mut self.last_sample, now_ms, self.interval_ms) {
            return false;
        }
        match (self.pressed, pressed) {
            (false, true) => {
                self.pressed = true;
                false
            }
            (true, false) => {
                self.pressed = false;
                true
            }
            _ => false,
        }
    }
}

/// Two-axis joystick with a select button
pub struct Joystick<X, Y, B> {
    x_axis: X,
    y_axis: Y,
    button: B,
    center_x: u16,
    center_y: u16,
    dead_zone: u16,
    divisor: u16,
    calibration_samples: u8,
    edges: ButtonEdgeDetector,
}

impl<X, Y, B> Joystick<X, Y, B>
where
    X: AnalogInput,
    Y: AnalogInput,
    B: InputPin,
{
    /// Create a joystick centered at mid-scale until calibrated
    pub fn new(x_axis: X, y_axis: Y, button: B, config: &JoystickConfig) -> Self {
        Self {
            x_axis,
            y_axis,
            button,
            center_x: 512,
            center_y: 512,
            dead_zone: config.dead_zone,
            divisor: config.divisor,
            calibration_samples: config.calibration_samples,
            edges: ButtonEdgeDetector::new(config.button_sample_ms),
        }
    }

    /// Capture the resting position of both axes
    ///
    /// Must be called while the stick is untouched.
    pub fn calibrate(&mut self) -> (u16, u16) {
        self.center_x = self.x_axis.read_averaged(self.calibration_samples);
        self.center_y = self.y_axis.read_averaged(self.calibration_samples);
        log_info!("joystick center x={} y={}", self.center_x, self.center_y);
        (self.center_x, self.center_y)
    }

    /// Read both axes and the button
    pub fn sample(&mut self, now_ms: u32) -> JoystickSample {
        let x_offset = i32::from(self.x_axis.read()) - i32::from(self.center_x);
        let y_offset = i32::from(self.y_axis.read()) - i32::from(self.center_y);
        let select = self.edges.update(now_ms, self.button.is_low());
        if select {
            log_debug!("select pressed at {}", now_ms);
        }
        JoystickSample {
            dx: axis_delta(x_offset, self.dead_zone, self.divisor),
            dy: axis_delta(y_offset, self.dead_zone, self.divisor),
            select,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;
    use proptest::prelude::*;
    use std::vec::Vec;

    struct ScriptedAxis {
        readings: Vec<u16>,
        next: usize,
    }

    impl ScriptedAxis {
        fn new(readings: &[u16]) -> Self {
            Self {
                readings: readings.to_vec(),
                next: 0,
            }
        }
    }

    impl AnalogInput for ScriptedAxis {
        fn read(&mut self) -> u16 {
            let value = self.readings[self.next.min(self.readings.len() - 1)];
            self.next += 1;
            value
        }
    }

    struct Pin<'a>(&'a Cell<bool>);

    impl InputPin for Pin<'_> {
        fn is_high(&self) -> bool {
            self.0.get()
        }
    }

    #[test]
    fn test_axis_delta_dead_zone() {
        assert_eq!(axis_delta(0, 4, 128), 0);
        assert_eq!(axis_delta(4, 4, 128), 0);
        assert_eq!(axis_delta(-4, 4, 128), 0);
        assert_eq!(axis_delta(5, 4, 128), 1);
        assert_eq!(axis_delta(-5, 4, 128), -1);
    }

    #[test]
    fn test_axis_delta_scaling() {
        assert_eq!(axis_delta(256, 4, 128), 2);
        assert_eq!(axis_delta(-511, 4, 128), -3);
        assert_eq!(axis_delta(1023, 4, 128), 7);
    }

    #[test]
    fn test_button_reports_on_release() {
        let mut edges = ButtonEdgeDetector::new(200);
        assert!(!edges.update(0, true));
        // Held: no event, even after many samples
        assert!(!edges.update(300, true));
        assert!(!edges.update(600, true));
        assert!(edges.update(900, false));
        assert!(!edges.update(1200, false));
    }

    #[test]
    fn test_button_ignores_fast_bounce() {
        let mut edges = ButtonEdgeDetector::new(200);
        assert!(!edges.update(0, true));
        assert!(!edges.update(50, false));
        assert!(!edges.update(120, true));
        assert!(!edges.update(180, false));
        assert!(edges.update(201, false));
    }

    #[test]
    fn test_button_wraparound_skips_one_sample() {
        let mut edges = ButtonEdgeDetector::new(200);
        assert!(!edges.update(u32::MAX - 50, true));
        assert!(!edges.update(10, false));
        assert!(edges.update(211, false));
    }

    #[test]
    fn test_calibrate_and_sample() {
        let level = Cell::new(true);
        let config = JoystickConfig::default();
        let x = ScriptedAxis::new(&[500, 500, 500, 500, 500, 500, 500, 500, 756]);
        let y = ScriptedAxis::new(&[520, 520, 520, 520, 520, 520, 520, 520, 522]);
        let mut stick = Joystick::new(x, y, Pin(&level), &config);

        assert_eq!(stick.calibrate(), (500, 520));
        let sample = stick.sample(0);
        assert_eq!(sample.dx, 2);
        assert_eq!(sample.dy, 0);
        assert!(!sample.select);
    }

    #[test]
    fn test_select_is_active_low() {
        let level = Cell::new(true);
        let config = JoystickConfig::default();
        let mut stick = Joystick::new(
            ScriptedAxis::new(&[512]),
            ScriptedAxis::new(&[512]),
            Pin(&level),
            &config,
        );

        level.set(false);
        assert!(!stick.sample(0).select);
        level.set(true);
        assert!(!stick.sample(100).select);
        assert!(stick.sample(250).select);
        assert!(!stick.sample(500).is_moving());
    }

    proptest! {
        #[test]
        fn prop_dead_zone(offset in -1023i32..=1023) {
            let delta = axis_delta(offset, 4, 128);
            if offset.abs() <= 4 {
                prop_assert_eq!(delta, 0);
            } else {
                prop_assert!(delta != 0);
                prop_assert_eq!(delta.signum(), offset.signum());
            }
        }

        #[test]
        fn prop_one_event_per_press_cycle(
            script in proptest::collection::vec((1u32..400, any::<bool>()), 1..128),
        ) {
            let mut edges = ButtonEdgeDetector::new(200);
            let mut now = 0u32;
            let mut level = false;
            let mut releases = 0;
            let mut events = 0;
            let mut last_event: Option<u32> = None;
            for (step, pressed) in script {
                now += step;
                if level && !pressed {
                    releases += 1;
                }
                level = pressed;
                if edges.update(now, pressed) {
                    events += 1;
                    if let Some(prev) = last_event {
                        prop_assert!(now - prev > 200);
                    }
                    last_event = Some(now);
                }
            }
            prop_assert!(events <= releases);
        }
    }
}
