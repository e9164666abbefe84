//! SD card presence check
//!
//! Puts the card into SPI mode and waits for the idle reply to CMD0. The map
//! tiles are not read yet; a missing or dead card is still fatal at boot.

use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

/// GO_IDLE_STATE with its fixed CRC
const CMD0: [u8; 6] = [0x40, 0x00, 0x00, 0x00, 0x00, 0x95];

/// R1 reply with only the idle bit set
const R1_IDLE: u8 = 0x01;

/// Bytes polled for the R1 reply (NCR is at most 8)
const RESPONSE_POLLS: usize = 8;

/// SD probe errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SdError {
    /// SPI transfer or chip select failed
    Bus,
    /// Card never answered CMD0
    NoResponse,
    /// Card answered with something other than idle
    UnexpectedResponse(u8),
}

/// Reset the card into SPI mode and check it reports idle
///
/// The bus must be clocked at 400 kHz or less.
pub fn probe_idle<SPI, CS>(spi: &mut SPI, cs: &mut CS) -> Result<(), SdError>
where
    SPI: SpiBus,
    CS: OutputPin,
{
    // At least 74 clocks with CS high to enter native mode
    cs.set_high().map_err(|_| SdError::Bus)?;
    spi.write(&[0xFF; 10]).map_err(|_| SdError::Bus)?;
    spi.flush().map_err(|_| SdError::Bus)?;

    cs.set_low().map_err(|_| SdError::Bus)?;
    let result = send_cmd0(spi);
    cs.set_high().map_err(|_| SdError::Bus)?;

    // Release DO
    spi.write(&[0xFF]).map_err(|_| SdError::Bus)?;
    spi.flush().map_err(|_| SdError::Bus)?;

    result
}

fn send_cmd0<SPI: SpiBus>(spi: &mut SPI) -> Result<(), SdError> {
    spi.write(&CMD0).map_err(|_| SdError::Bus)?;

    for _ in 0..RESPONSE_POLLS {
        let mut byte = [0xFF];
        spi.transfer_in_place(&mut byte).map_err(|_| SdError::Bus)?;
        match byte[0] {
            0xFF => continue,
            R1_IDLE => return Ok(()),
            other => return Err(SdError::UnexpectedResponse(other)),
        }
    }

    Err(SdError::NoResponse)
}
