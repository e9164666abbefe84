//! Start/stop point selection
//!
//! ```text
//!            select(p)                   select(q)
//!  AwaitingStart ──► AwaitingStop { start: p } ──► AwaitingStart
//!                                                  + PathRequest(p, q)
//! ```

use waymark_protocol::{GeoPoint, PathRequest};

/// Which point the next select press picks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SelectionState {
    #[default]
    AwaitingStart,
    AwaitingStop { start: GeoPoint },
}

impl SelectionState {
    /// Record a selected point
    ///
    /// Returns the next state and, when the pair is complete, the request
    /// to send.
    pub fn advance(self, point: GeoPoint) -> (Self, Option<PathRequest>) {
        match self {
            Self::AwaitingStart => (Self::AwaitingStop { start: point }, None),
            Self::AwaitingStop { start } => {
                (Self::AwaitingStart, Some(PathRequest::new(start, point)))
            }
        }
    }

    /// Status prompt for this state
    pub fn prompt(&self) -> &'static str {
        match self {
            Self::AwaitingStart => "FROM?",
            Self::AwaitingStop { .. } => "TO?",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_selections_make_one_request() {
        let a = GeoPoint::new(1, 2);
        let b = GeoPoint::new(3, 4);

        let (state, request) = SelectionState::default().advance(a);
        assert_eq!(state, SelectionState::AwaitingStop { start: a });
        assert_eq!(request, None);
        assert_eq!(state.prompt(), "TO?");

        let (state, request) = state.advance(b);
        assert_eq!(state, SelectionState::AwaitingStart);
        assert_eq!(request, Some(PathRequest::new(a, b)));
        assert_eq!(state.prompt(), "FROM?");
    }

    #[test]
    fn test_degenerate_pair_passes_through() {
        let a = GeoPoint::new(5, 5);
        let (state, _) = SelectionState::AwaitingStart.advance(a);
        let (_, request) = state.advance(a);
        assert_eq!(request, Some(PathRequest::new(a, a)));
    }
}
