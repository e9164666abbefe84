//! Board adapters
//!
//! Wrap embassy-rp peripherals in the `waymark-hal` traits the navigation
//! core is written against.

use core::cell::RefCell;

use defmt::*;
use embassy_rp::adc::{Adc, Blocking, Channel};
use embassy_rp::gpio::Input;
use embassy_rp::uart;
use embassy_time::Instant;
use embedded_io::{Read, ReadReady, Write};

use waymark_hal::adc::{normalize, ANALOG_FULL_SCALE};
use waymark_hal::{AnalogInput, Clock, InputPin, UartRx, UartTx};

/// RP2040 ADC resolution
pub const ADC_BITS: u8 = 12;

/// One joystick axis on a shared ADC
///
/// A failed conversion repeats the previous reading.
pub struct AdcAxis {
    adc: &'static RefCell<Adc<'static, Blocking>>,
    channel: Channel<'static>,
    last: u16,
}

impl AdcAxis {
    pub fn new(adc: &'static RefCell<Adc<'static, Blocking>>, channel: Channel<'static>) -> Self {
        Self {
            adc,
            channel,
            last: ANALOG_FULL_SCALE / 2,
        }
    }
}

impl AnalogInput for AdcAxis {
    fn read(&mut self) -> u16 {
        match self.adc.borrow_mut().blocking_read(&mut self.channel) {
            Ok(raw) => self.last = normalize(raw, ADC_BITS),
            Err(_) => trace!("ADC conversion failed, keeping {}", self.last),
        }
        self.last
    }
}

/// Push button on a GPIO input
pub struct Button(pub Input<'static>);

impl InputPin for Button {
    fn is_high(&self) -> bool {
        self.0.is_high()
    }
}

/// Milliseconds since boot from the embassy time driver
#[derive(Clone, Copy, Default)]
pub struct BoardClock;

impl Clock for BoardClock {
    fn now_ms(&self) -> u32 {
        Instant::now().as_millis() as u32
    }
}

/// Serial link to the path server over any `embedded-io` port
pub struct SerialLink<T> {
    port: T,
}

impl<T> SerialLink<T> {
    pub fn new(port: T) -> Self {
        Self { port }
    }
}

impl<T: Write> UartTx for SerialLink<T> {
    type Error = T::Error;

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.port.write_all(data)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.port.flush()
    }
}

impl<T: Read + ReadReady> UartRx for SerialLink<T> {
    type Error = T::Error;

    fn try_read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        // `read` blocks until a byte arrives, only call it when one is there
        if buf.is_empty() || !self.port.read_ready()? {
            return Ok(0);
        }
        self.port.read(buf)
    }
}

/// Embassy UART settings for the path server link (8N1)
pub fn uart_config(baudrate: u32) -> uart::Config {
    let mut cfg = uart::Config::default();
    cfg.baudrate = baudrate;
    cfg
}
