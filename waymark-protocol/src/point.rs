//! Geographic point type

/// Fixed-point geographic coordinate
///
/// The path server works in hundred-thousandths of a degree, truncated to
/// integers. Values are carried through the device unchanged; only the
/// projection interprets them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GeoPoint {
    /// Latitude
    pub lat: i32,
    /// Longitude
    pub lon: i32,
}

impl GeoPoint {
    /// Create a point from latitude and longitude
    pub const fn new(lat: i32, lon: i32) -> Self {
        Self { lat, lon }
    }
}

impl From<(i32, i32)> for GeoPoint {
    fn from((lat, lon): (i32, i32)) -> Self {
        Self { lat, lon }
    }
}
