//! Route storage and the service that produces routes
//!
//! A [`Route`] is replaced as a whole: the controller drops the previous
//! route before asking for a new one, and only ever stores a fully
//! received result.

pub mod client;

use alloc::vec::Vec;

use waymark_protocol::{GeoPoint, ProtocolError};

pub use client::RouteRequestClient;

/// Route request failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RouteError {
    /// The server went silent for longer than the timeout
    TimedOut,
    /// The reply did not follow the protocol
    Protocol(ProtocolError),
    /// The server announced more points than the device accepts
    TooManyPoints { points: usize },
    /// The point buffer could not be allocated
    AllocationFailed { points: usize },
    /// The serial link reported an error
    Link,
}

impl RouteError {
    /// Short notice for the status strip
    pub fn notice(&self) -> &'static str {
        match self {
            Self::TimedOut => "TIMEOUT",
            Self::Protocol(_) => "BAD REPLY",
            Self::TooManyPoints { .. } => "TOO LONG",
            Self::AllocationFailed { .. } => "NO MEMORY",
            Self::Link => "LINK ERROR",
        }
    }
}

impl From<ProtocolError> for RouteError {
    fn from(err: ProtocolError) -> Self {
        Self::Protocol(err)
    }
}

/// Ordered route points as returned by the server
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Route {
    points: Vec<GeoPoint>,
}

impl Route {
    /// Empty route, no allocation
    pub const fn new() -> Self {
        Self { points: Vec::new() }
    }

    /// Empty route with room for exactly `points` entries
    ///
    /// Fails instead of aborting when the heap cannot hold them.
    pub fn try_with_capacity(points: usize) -> Result<Self, RouteError> {
        let mut storage = Vec::new();
        storage
            .try_reserve_exact(points)
            .map_err(|_| RouteError::AllocationFailed { points })?;
        Ok(Self { points: storage })
    }

    pub(crate) fn push(&mut self, point: GeoPoint) {
        self.points.push(point);
    }

    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Consecutive point pairs, one per drawn segment
    pub fn segments(&self) -> impl Iterator<Item = (GeoPoint, GeoPoint)> + '_ {
        self.points.windows(2).map(|pair| (pair[0], pair[1]))
    }

    /// Drop all points and release their storage
    pub fn clear(&mut self) {
        self.points = Vec::new();
    }
}

impl FromIterator<GeoPoint> for Route {
    fn from_iter<I: IntoIterator<Item = GeoPoint>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

/// Something that can turn two points into a route
///
/// Implementations may block until the answer arrives.
pub trait RouteService {
    fn request_route(&mut self, start: GeoPoint, stop: GeoPoint) -> Result<Route, RouteError>;
}

impl<T: RouteService + ?Sized> RouteService for &mut T {
    fn request_route(&mut self, start: GeoPoint, stop: GeoPoint) -> Result<Route, RouteError> {
        (**self).request_route(start, stop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segments() {
        let route: Route = [
            GeoPoint::new(1, 1),
            GeoPoint::new(2, 2),
            GeoPoint::new(3, 3),
        ]
        .into_iter()
        .collect();
        let segments: std::vec::Vec<_> = route.segments().collect();
        assert_eq!(
            segments,
            [
                (GeoPoint::new(1, 1), GeoPoint::new(2, 2)),
                (GeoPoint::new(2, 2), GeoPoint::new(3, 3)),
            ]
        );
    }

    #[test]
    fn test_short_routes_have_no_segments() {
        assert_eq!(Route::new().segments().count(), 0);
        let single: Route = core::iter::once(GeoPoint::new(1, 1)).collect();
        assert_eq!(single.segments().count(), 0);
    }

    #[test]
    fn test_try_with_capacity() {
        let route = Route::try_with_capacity(16).unwrap();
        assert!(route.is_empty());
        assert_eq!(
            Route::try_with_capacity(usize::MAX),
            Err(RouteError::AllocationFailed { points: usize::MAX })
        );
    }

    #[test]
    fn test_clear_releases() {
        let mut route: Route = core::iter::repeat(GeoPoint::default()).take(4).collect();
        route.clear();
        assert!(route.is_empty());
        assert_eq!(route.points.capacity(), 0);
    }

    #[test]
    fn test_error_notices() {
        assert_eq!(RouteError::TimedOut.notice(), "TIMEOUT");
        assert_eq!(
            RouteError::from(ProtocolError::InvalidInteger).notice(),
            "BAD REPLY"
        );
        assert_eq!(RouteError::TooManyPoints { points: 9 }.notice(), "TOO LONG");
    }
}
