//! Blocking route client over the serial link
//!
//! One exchange:
//!
//! ```text
//!  drain stale rx ─► send start line ─► send stop line ─► flush
//!                                                          │
//!        ┌─────────────────────────────────────────────────┘
//!        ▼
//!  read count N ─► reserve N points ─► read 2N value lines ─► Route
//! ```
//!
//! The timeout is an inactivity timeout: every received byte restarts it,
//! so a long route trickling in at 9600 baud does not expire, while a
//! silent server does.

use waymark_hal::time::has_expired;
use waymark_hal::{Clock, UartRx, UartTx};
use waymark_protocol::{GeoPoint, LineReader, PathRequest, ResponseEvent, ResponseParser};

use super::{Route, RouteError, RouteService};
use crate::config::RouteConfig;

/// Scratch size for each receive poll
const RX_CHUNK: usize = 32;

/// Route client speaking the line protocol over a UART
pub struct RouteRequestClient<L, C> {
    link: L,
    clock: C,
    timeout_ms: u32,
    max_points: usize,
    reader: LineReader,
}

impl<L, C> RouteRequestClient<L, C>
where
    L: UartTx + UartRx,
    C: Clock,
{
    pub fn new(link: L, clock: C, config: &RouteConfig) -> Self {
        Self {
            link,
            clock,
            timeout_ms: config.timeout_ms,
            max_points: usize::from(config.max_points),
            reader: LineReader::new(),
        }
    }

    /// Request a route with an explicit inactivity timeout
    pub fn request_route_with_timeout(
        &mut self,
        start: GeoPoint,
        stop: GeoPoint,
        timeout_ms: u32,
    ) -> Result<Route, RouteError> {
        let request = PathRequest::new(start, stop);
        self.send_request(&request)?;
        let result = self.read_response(timeout_ms);
        match &result {
            Ok(route) => log_info!("route received: {} points", route.len()),
            Err(err) => log_warn!("route request failed: {:?}", err),
        }
        result
    }

    /// Give back the link and the clock
    pub fn release(self) -> (L, C) {
        (self.link, self.clock)
    }

    fn send_request(&mut self, request: &PathRequest) -> Result<(), RouteError> {
        let stale = self.link.discard_pending().map_err(|_| RouteError::Link)?;
        if stale > 0 {
            log_debug!("dropped {} stale bytes", stale);
        }
        self.reader.reset();

        let mut buffer = [0u8; waymark_protocol::LINE_BUFFER_SIZE + 1];
        for line in request.lines() {
            let len = line.encode(&mut buffer)?;
            log_trace!("tx {}", line.as_str());
            self.link
                .write_blocking(&buffer[..len])
                .map_err(|_| RouteError::Link)?;
        }
        self.link.flush().map_err(|_| RouteError::Link)
    }

    fn read_response(&mut self, timeout_ms: u32) -> Result<Route, RouteError> {
        let mut parser = ResponseParser::new();
        let mut route = Route::new();
        let mut chunk = [0u8; RX_CHUNK];
        let mut last_activity = self.clock.now_ms();

        loop {
            let received = self.link.try_read(&mut chunk).map_err(|_| RouteError::Link)?;
            if received == 0 {
                if has_expired(self.clock.now_ms(), last_activity, timeout_ms) {
                    return Err(RouteError::TimedOut);
                }
                continue;
            }
            last_activity = self.clock.now_ms();

            for &byte in &chunk[..received] {
                let Some(line) = self.reader.feed_str(byte) else {
                    continue;
                };
                let line = line?.trim();
                // LF followed by CR, or a stray NUL, yields an empty line
                if line.is_empty() {
                    continue;
                }
                match parser.feed_line(line)? {
                    Some(ResponseEvent::Count(points)) => {
                        if points > self.max_points {
                            return Err(RouteError::TooManyPoints { points });
                        }
                        route = Route::try_with_capacity(points)?;
                    }
                    Some(ResponseEvent::Point(point)) => route.push(point),
                    None => {}
                }
                if parser.is_complete() {
                    return Ok(route);
                }
            }
        }
    }
}

impl<L, C> RouteService for RouteRequestClient<L, C>
where
    L: UartTx + UartRx,
    C: Clock,
{
    fn request_route(&mut self, start: GeoPoint, stop: GeoPoint) -> Result<Route, RouteError> {
        let timeout_ms = self.timeout_ms;
        self.request_route_with_timeout(start, stop, timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;
    use std::collections::VecDeque;
    use std::vec::Vec;
    use waymark_protocol::ProtocolError;

    /// Serial link that releases a canned reply once the request is flushed
    struct ScriptedLink {
        rx: VecDeque<u8>,
        tx: Vec<u8>,
        reply: Option<Vec<u8>>,
    }

    impl ScriptedLink {
        fn replying(reply: &[u8]) -> Self {
            Self {
                rx: VecDeque::new(),
                tx: Vec::new(),
                reply: Some(reply.to_vec()),
            }
        }

        fn silent() -> Self {
            Self {
                rx: VecDeque::new(),
                tx: Vec::new(),
                reply: None,
            }
        }
    }

    impl UartTx for ScriptedLink {
        type Error = ();

        fn write_blocking(&mut self, data: &[u8]) -> Result<(), ()> {
            self.tx.extend_from_slice(data);
            Ok(())
        }

        fn flush(&mut self) -> Result<(), ()> {
            if let Some(reply) = self.reply.take() {
                self.rx.extend(reply);
            }
            Ok(())
        }
    }

    impl UartRx for ScriptedLink {
        type Error = ();

        fn try_read(&mut self, buf: &mut [u8]) -> Result<usize, ()> {
            let n = self.rx.len().min(buf.len());
            for slot in &mut buf[..n] {
                *slot = self.rx.pop_front().unwrap();
            }
            Ok(n)
        }
    }

    /// Clock that advances a fixed step every time it is read
    struct SteppingClock {
        now: Cell<u32>,
        step: u32,
    }

    impl SteppingClock {
        fn new(step: u32) -> Self {
            Self {
                now: Cell::new(0),
                step,
            }
        }
    }

    impl Clock for SteppingClock {
        fn now_ms(&self) -> u32 {
            let now = self.now.get();
            self.now.set(now.wrapping_add(self.step));
            now
        }
    }

    const START: GeoPoint = GeoPoint::new(49_123_456, -123_123_456);
    const STOP: GeoPoint = GeoPoint::new(49_000_000, -123_000_000);

    fn client(link: ScriptedLink) -> RouteRequestClient<ScriptedLink, SteppingClock> {
        RouteRequestClient::new(link, SteppingClock::new(10), &RouteConfig::default())
    }

    #[test]
    fn test_request_lines_on_the_wire() {
        let mut client = client(ScriptedLink::replying(b"0\n"));
        let route = client.request_route(START, STOP).unwrap();
        assert!(route.is_empty());
        let (link, _) = client.release();
        assert_eq!(link.tx, b"-123123456, 49123456\r\n-123000000, 49000000\r\n");
    }

    #[test]
    fn test_route_received() {
        let mut client = client(ScriptedLink::replying(b"2\n10\n20\n30\n40\n"));
        let route = client.request_route(START, STOP).unwrap();
        assert_eq!(
            route.points(),
            [GeoPoint::new(10, 20), GeoPoint::new(30, 40)]
        );
    }

    #[test]
    fn test_crlf_reply() {
        let mut client = client(ScriptedLink::replying(b"1\r\n-5\r\n 7 \r\n"));
        let route = client.request_route(START, STOP).unwrap();
        assert_eq!(route.points(), [GeoPoint::new(-5, 7)]);
    }

    #[test]
    fn test_stale_bytes_dropped() {
        let mut link = ScriptedLink::replying(b"1\n1\n2\n");
        link.rx.extend(b"99\ngarbage\n".iter().copied());
        let mut client = client(link);
        let route = client.request_route(START, STOP).unwrap();
        assert_eq!(route.points(), [GeoPoint::new(1, 2)]);
    }

    #[test]
    fn test_silent_server_times_out() {
        let mut client = client(ScriptedLink::silent());
        assert_eq!(client.request_route(START, STOP), Err(RouteError::TimedOut));
    }

    #[test]
    fn test_truncated_reply_times_out() {
        let mut client = client(ScriptedLink::replying(b"2\n10\n20\n30\n"));
        assert_eq!(client.request_route(START, STOP), Err(RouteError::TimedOut));
    }

    #[test]
    fn test_custom_timeout() {
        let mut client = client(ScriptedLink::silent());
        assert_eq!(
            client.request_route_with_timeout(START, STOP, 50),
            Err(RouteError::TimedOut)
        );
        let (_, clock) = client.release();
        assert!(clock.now.get() < 200);
    }

    #[test]
    fn test_bad_reply() {
        let mut client = client(ScriptedLink::replying(b"2\n10\nnorth\n"));
        assert_eq!(
            client.request_route(START, STOP),
            Err(RouteError::Protocol(ProtocolError::InvalidInteger))
        );
    }

    #[test]
    fn test_negative_count() {
        let mut client = client(ScriptedLink::replying(b"-3\n"));
        assert_eq!(
            client.request_route(START, STOP),
            Err(RouteError::Protocol(ProtocolError::InvalidCount))
        );
    }

    #[test]
    fn test_too_many_points() {
        let mut client = client(ScriptedLink::replying(b"5000\n"));
        assert_eq!(
            client.request_route(START, STOP),
            Err(RouteError::TooManyPoints { points: 5000 })
        );
    }

    #[test]
    fn test_client_reusable_after_failure() {
        let mut client = client(ScriptedLink::replying(b"2\n1\nx\n"));
        assert!(client.request_route(START, STOP).is_err());
        let (mut link, clock) = client.release();
        link.reply = Some(b"1\n3\n4\n".to_vec());
        let mut client = RouteRequestClient::new(link, clock, &RouteConfig::default());
        assert_eq!(
            client.request_route(START, STOP).unwrap().points(),
            [GeoPoint::new(3, 4)]
        );
    }
}
