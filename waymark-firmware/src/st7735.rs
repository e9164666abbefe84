//! ST7735 TFT Display Driver
//!
//! Driver for 128x160 ST7735 (red tab) panels over a write-only SPI bus.
//! Pixels are RGB565, sent big-endian. Exposed as an `embedded-graphics`
//! draw target; there is no frame buffer, every draw goes straight to the
//! panel's RAM.

use embedded_graphics::pixelcolor::raw::{RawData, RawU16};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

/// Panel dimensions in portrait orientation
pub const WIDTH: u32 = 128;
pub const HEIGHT: u32 = 160;

/// Bytes streamed per SPI write when filling a window
const FILL_CHUNK: usize = 64;

/// ST7735 commands
mod cmd {
    pub const SWRESET: u8 = 0x01;
    pub const SLPOUT: u8 = 0x11;
    pub const NORON: u8 = 0x13;
    pub const INVOFF: u8 = 0x20;
    pub const DISPON: u8 = 0x29;
    pub const CASET: u8 = 0x2A;
    pub const RASET: u8 = 0x2B;
    pub const RAMWR: u8 = 0x2C;
    pub const MADCTL: u8 = 0x36;
    pub const COLMOD: u8 = 0x3A;
    pub const FRMCTR1: u8 = 0xB1;
    pub const FRMCTR2: u8 = 0xB2;
    pub const FRMCTR3: u8 = 0xB3;
    pub const INVCTR: u8 = 0xB4;
    pub const PWCTR1: u8 = 0xC0;
    pub const PWCTR2: u8 = 0xC1;
    pub const PWCTR3: u8 = 0xC2;
    pub const PWCTR4: u8 = 0xC3;
    pub const PWCTR5: u8 = 0xC4;
    pub const VMCTR1: u8 = 0xC5;
    pub const GMCTRP1: u8 = 0xE0;
    pub const GMCTRN1: u8 = 0xE1;
}

/// Power-up sequence: (command, parameters, delay after in ms)
const INIT_SEQUENCE: &[(u8, &[u8], u32)] = &[
    (cmd::SWRESET, &[], 150),
    (cmd::SLPOUT, &[], 255),
    (cmd::FRMCTR1, &[0x01, 0x2C, 0x2D], 0),
    (cmd::FRMCTR2, &[0x01, 0x2C, 0x2D], 0),
    (cmd::FRMCTR3, &[0x01, 0x2C, 0x2D, 0x01, 0x2C, 0x2D], 0),
    (cmd::INVCTR, &[0x07], 0),
    (cmd::PWCTR1, &[0xA2, 0x02, 0x84], 0),
    (cmd::PWCTR2, &[0xC5], 0),
    (cmd::PWCTR3, &[0x0A, 0x00], 0),
    (cmd::PWCTR4, &[0x8A, 0x2A], 0),
    (cmd::PWCTR5, &[0x8A, 0xEE], 0),
    (cmd::VMCTR1, &[0x0E], 0),
    (cmd::INVOFF, &[], 0),
    // Row/column order for portrait with the connector at the bottom, BGR
    (cmd::MADCTL, &[0xC8], 0),
    // 16 bits per pixel
    (cmd::COLMOD, &[0x05], 0),
    (cmd::CASET, &[0x00, 0x00, 0x00, 0x7F], 0),
    (cmd::RASET, &[0x00, 0x00, 0x00, 0x9F], 0),
    (
        cmd::GMCTRP1,
        &[
            0x02, 0x1C, 0x07, 0x12, 0x37, 0x32, 0x29, 0x2D, 0x29, 0x25, 0x2B, 0x39, 0x00, 0x01,
            0x03, 0x10,
        ],
        0,
    ),
    (
        cmd::GMCTRN1,
        &[
            0x03, 0x1D, 0x07, 0x06, 0x2E, 0x2C, 0x29, 0x2D, 0x2E, 0x2E, 0x37, 0x3F, 0x00, 0x00,
            0x02, 0x10,
        ],
        0,
    ),
    (cmd::NORON, &[], 10),
    (cmd::DISPON, &[], 100),
];

/// Errors from the panel link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum St7735Error {
    /// SPI transfer failed
    Spi,
    /// Driving DC, CS or RST failed
    Pin,
}

/// ST7735 TFT driver
pub struct St7735<SPI, DC, CS, RST> {
    spi: SPI,
    dc: DC,
    cs: CS,
    rst: RST,
}

impl<SPI, DC, CS, RST> St7735<SPI, DC, CS, RST>
where
    SPI: SpiBus,
    DC: OutputPin,
    CS: OutputPin,
    RST: OutputPin,
{
    /// Create a new ST7735 driver
    pub fn new(spi: SPI, dc: DC, cs: CS, rst: RST) -> Self {
        Self { spi, dc, cs, rst }
    }

    /// Hardware reset followed by the power-up sequence
    pub fn init<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), St7735Error> {
        self.cs.set_high().map_err(|_| St7735Error::Pin)?;
        self.rst.set_high().map_err(|_| St7735Error::Pin)?;
        delay.delay_ms(5);
        self.rst.set_low().map_err(|_| St7735Error::Pin)?;
        delay.delay_ms(5);
        self.rst.set_high().map_err(|_| St7735Error::Pin)?;
        delay.delay_ms(150);

        for &(command, params, wait_ms) in INIT_SEQUENCE {
            self.command(command, params)?;
            if wait_ms > 0 {
                delay.delay_ms(wait_ms);
            }
        }

        Ok(())
    }

    /// Send a command and its parameters in one chip-select cycle
    fn command(&mut self, command: u8, params: &[u8]) -> Result<(), St7735Error> {
        self.cs.set_low().map_err(|_| St7735Error::Pin)?;
        let result = self.write_command(command, params);
        self.cs.set_high().map_err(|_| St7735Error::Pin)?;
        result
    }

    fn write_command(&mut self, command: u8, params: &[u8]) -> Result<(), St7735Error> {
        // DC may only change once the bus is idle
        self.dc.set_low().map_err(|_| St7735Error::Pin)?;
        self.spi.write(&[command]).map_err(|_| St7735Error::Spi)?;
        self.spi.flush().map_err(|_| St7735Error::Spi)?;

        if !params.is_empty() {
            self.dc.set_high().map_err(|_| St7735Error::Pin)?;
            self.spi.write(params).map_err(|_| St7735Error::Spi)?;
            self.spi.flush().map_err(|_| St7735Error::Spi)?;
        }

        Ok(())
    }

    /// Fill the inclusive window `(x0, y0)..=(x1, y1)` with one color
    fn fill_window(
        &mut self,
        x0: u16,
        y0: u16,
        x1: u16,
        y1: u16,
        color: Rgb565,
    ) -> Result<(), St7735Error> {
        let [x0h, x0l] = x0.to_be_bytes();
        let [x1h, x1l] = x1.to_be_bytes();
        let [y0h, y0l] = y0.to_be_bytes();
        let [y1h, y1l] = y1.to_be_bytes();
        self.command(cmd::CASET, &[x0h, x0l, x1h, x1l])?;
        self.command(cmd::RASET, &[y0h, y0l, y1h, y1l])?;

        let pixels = (u32::from(x1 - x0) + 1) * (u32::from(y1 - y0) + 1);

        self.cs.set_low().map_err(|_| St7735Error::Pin)?;
        let result = self.stream(color, pixels);
        self.cs.set_high().map_err(|_| St7735Error::Pin)?;
        result
    }

    fn stream(&mut self, color: Rgb565, pixels: u32) -> Result<(), St7735Error> {
        self.write_command(cmd::RAMWR, &[])?;
        self.dc.set_high().map_err(|_| St7735Error::Pin)?;

        let [hi, lo] = RawU16::from(color).into_inner().to_be_bytes();
        let mut chunk = [0u8; FILL_CHUNK];
        for pair in chunk.chunks_exact_mut(2) {
            pair[0] = hi;
            pair[1] = lo;
        }

        let mut remaining = pixels as usize * 2;
        while remaining > 0 {
            let n = remaining.min(FILL_CHUNK);
            self.spi.write(&chunk[..n]).map_err(|_| St7735Error::Spi)?;
            remaining -= n;
        }

        self.spi.flush().map_err(|_| St7735Error::Spi)
    }
}

impl<SPI, DC, CS, RST> OriginDimensions for St7735<SPI, DC, CS, RST> {
    fn size(&self) -> Size {
        Size::new(WIDTH, HEIGHT)
    }
}

impl<SPI, DC, CS, RST> DrawTarget for St7735<SPI, DC, CS, RST>
where
    SPI: SpiBus,
    DC: OutputPin,
    CS: OutputPin,
    RST: OutputPin,
{
    type Color = Rgb565;
    type Error = St7735Error;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let bounds = self.bounding_box();
        for Pixel(point, color) in pixels {
            if !bounds.contains(point) {
                continue;
            }
            let (x, y) = (point.x as u16, point.y as u16);
            self.fill_window(x, y, x, y, color)?;
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let area = area.intersection(&self.bounding_box());
        let Some(bottom_right) = area.bottom_right() else {
            return Ok(());
        };
        self.fill_window(
            area.top_left.x as u16,
            area.top_left.y as u16,
            bottom_right.x as u16,
            bottom_right.y as u16,
            color,
        )
    }
}
