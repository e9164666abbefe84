//! UART serial communication abstractions
//!
//! The route client runs in the cooperative main loop, so reception is
//! polled: [`UartRx::try_read`] must return immediately with whatever bytes
//! are already buffered.

/// UART transmitter
pub trait UartTx {
    /// Error type for transmit operations
    type Error;

    /// Write data to the UART
    ///
    /// Blocks until all data has been written or an error occurs.
    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Flush any buffered data
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// UART receiver
pub trait UartRx {
    /// Error type for receive operations
    type Error;

    /// Read already-received bytes without waiting
    ///
    /// Returns the number of bytes copied into `buf`, `0` when nothing
    /// is pending.
    fn try_read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Drop everything currently buffered
    ///
    /// Returns the number of bytes discarded.
    fn discard_pending(&mut self) -> Result<usize, Self::Error> {
        let mut buf = [0u8; 16];
        let mut total = 0;
        loop {
            let n = self.try_read(&mut buf)?;
            if n == 0 {
                return Ok(total);
            }
            total += n;
        }
    }
}
