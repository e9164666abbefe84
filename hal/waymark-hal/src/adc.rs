//! Analog input abstractions

/// Full-scale value of a normalized analog reading
pub const ANALOG_FULL_SCALE: u16 = 1023;

/// Analog input channel
///
/// Readings are normalized to 10 bits (`0..=1023`) regardless of the
/// converter's native resolution, so dead-zone and scaling constants are
/// board independent.
pub trait AnalogInput {
    /// Take one conversion
    fn read(&mut self) -> u16;

    /// Average `samples` conversions
    ///
    /// Used for center calibration where a single reading is too noisy.
    fn read_averaged(&mut self, samples: u8) -> u16 {
        let samples = samples.max(1);
        let mut sum: u32 = 0;
        for _ in 0..samples {
            sum += u32::from(self.read());
        }
        (sum / u32::from(samples)) as u16
    }
}

/// Scale a raw reading of `bits` resolution down (or up) to 10 bits
pub fn normalize(raw: u16, bits: u8) -> u16 {
    let value = if bits > 10 {
        raw >> (bits - 10)
    } else {
        raw << (10 - bits)
    };
    value.min(ANALOG_FULL_SCALE)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Sequence {
        values: [u16; 4],
        next: usize,
    }

    impl AnalogInput for Sequence {
        fn read(&mut self) -> u16 {
            let v = self.values[self.next % self.values.len()];
            self.next += 1;
            v
        }
    }

    #[test]
    fn test_normalize_12_bit() {
        assert_eq!(normalize(4095, 12), 1023);
        assert_eq!(normalize(2048, 12), 512);
        assert_eq!(normalize(0, 12), 0);
    }

    #[test]
    fn test_normalize_8_bit() {
        assert_eq!(normalize(128, 8), 512);
    }

    #[test]
    fn test_read_averaged() {
        let mut input = Sequence {
            values: [510, 514, 511, 513],
            next: 0,
        };
        assert_eq!(input.read_averaged(4), 512);
    }

    #[test]
    fn test_read_averaged_zero_samples() {
        let mut input = Sequence {
            values: [100, 100, 100, 100],
            next: 0,
        };
        assert_eq!(input.read_averaged(0), 100);
    }
}
