//! Waymark - Handheld Map Navigator Firmware
//!
//! Main firmware binary for RP2040 boards with a 128x160 ST7735 panel, an
//! analog joystick, two zoom buttons and a serial link to a path server.
//!
//! Pick two points on the map with the joystick button; the path server
//! answers with the route between them and the device draws it.

#![no_std]
#![no_main]

extern crate alloc;

use core::cell::RefCell;

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::adc::{Adc, Blocking, Channel};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::peripherals::UART0;
use embassy_rp::spi::{self, Spi};
use embassy_rp::uart::{BufferedInterruptHandler, Uart};
use embassy_time::Delay;
use embedded_alloc::LlffHeap as Heap;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use waymark_core::config::{parse_config, NavConfig};
use waymark_core::input::{Joystick, ZoomDirection};
use waymark_core::nav::NavigationController;
use waymark_core::route::RouteRequestClient;
use waymark_core::traits::{LinearProjection, Projection};

use crate::board::{AdcAxis, BoardClock, Button, SerialLink};
use crate::screen::BoardScreen;
use crate::st7735::St7735;

mod board;
mod screen;
mod sdcard;
mod st7735;
mod tasks;

// Heap allocator for route polylines
#[global_allocator]
static HEAP: Heap = Heap::empty();

// Heap size: 32KB (a 1000-point route needs 8KB)
const HEAP_SIZE: usize = 32 * 1024;

/// Embedded device configuration (compiled into firmware)
/// Edit device.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../device.toml");

/// Display SPI clock
const DISPLAY_SPI_HZ: u32 = 16_000_000;

/// SD card clock during the idle handshake
const SD_INIT_SPI_HZ: u32 = 400_000;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 64]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

// Both joystick axes share the one ADC
static ADC: StaticCell<RefCell<Adc<'static, Blocking>>> = StaticCell::new();

/// Main entry point
///
/// Brings up the board, then runs the navigation loop on this task.
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("Waymark firmware starting...");

    // Initialize heap allocator
    init_heap();
    info!("Heap initialized: {} bytes", HEAP_SIZE);

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = load_config();

    // Display: SPI0 write-only (SCK=GPIO18, MOSI=GPIO19), DC=GPIO16, CS=GPIO17, RST=GPIO20
    let mut display_spi_config = spi::Config::default();
    display_spi_config.frequency = DISPLAY_SPI_HZ;
    let display_spi = Spi::new_blocking_txonly(p.SPI0, p.PIN_18, p.PIN_19, display_spi_config);
    let mut display = St7735::new(
        display_spi,
        Output::new(p.PIN_16, Level::Low),
        Output::new(p.PIN_17, Level::High),
        Output::new(p.PIN_20, Level::High),
    );
    if let Err(e) = display.init(&mut Delay) {
        error!("Display init failed: {:?}", e);
        fatal_halt("display");
    }
    info!("Display initialized");

    // SD card: SPI1 (SCK=GPIO10, MOSI=GPIO11, MISO=GPIO12), CS=GPIO13
    let mut sd_spi_config = spi::Config::default();
    sd_spi_config.frequency = SD_INIT_SPI_HZ;
    let mut sd_spi = Spi::new_blocking(p.SPI1, p.PIN_10, p.PIN_11, p.PIN_12, sd_spi_config);
    let mut sd_cs = Output::new(p.PIN_13, Level::High);
    if let Err(e) = sdcard::probe_idle(&mut sd_spi, &mut sd_cs) {
        error!("SD card probe failed: {:?}", e);
        fatal_halt("storage");
    }
    info!("SD card ready");

    // Joystick: X=GPIO26 (ADC0), Y=GPIO27 (ADC1), select=GPIO22 (active low)
    let adc: &'static RefCell<_> = ADC.init(RefCell::new(Adc::new_blocking(
        p.ADC,
        embassy_rp::adc::Config::default(),
    )));
    let x_axis = AdcAxis::new(adc, Channel::new_pin(p.PIN_26, Pull::None));
    let y_axis = AdcAxis::new(adc, Channel::new_pin(p.PIN_27, Pull::None));
    let select = Button(Input::new(p.PIN_22, Pull::Up));
    let mut joystick = Joystick::new(x_axis, y_axis, select, &config.joystick);
    joystick.calibrate();

    let Some(projection) = LinearProjection::new(&config.maps) else {
        error!("No map levels configured");
        fatal_halt("map levels");
    };
    let controller = NavigationController::new(projection, &config);
    tasks::ZOOM.configure(
        controller.level(),
        controller.projection().max_level(),
        config.zoom.debounce_ms,
    );
    info!(
        "Map: {} levels, starting at level {}",
        controller.projection().levels(),
        controller.level()
    );

    // Path server link: UART0 (TX=GPIO0, RX=GPIO1)
    let tx_buf = TX_BUF.init([0u8; 64]);
    let rx_buf = RX_BUF.init([0u8; 256]);
    let uart_config = board::uart_config(config.serial.baudrate);
    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let routes = RouteRequestClient::new(SerialLink::new(uart), BoardClock, &config.route);
    info!("UART initialized at {} baud", config.serial.baudrate);

    // Zoom buttons: in=GPIO14, out=GPIO15 (active low)
    // Their tasks preempt the navigation loop, which blocks during route requests
    let zoom_in = Input::new(p.PIN_14, Pull::Up);
    let zoom_out = Input::new(p.PIN_15, Pull::Up);
    let zoom_spawner = tasks::start_zoom_executor();
    zoom_spawner.spawn(tasks::zoom_button_task(zoom_in, ZoomDirection::In).unwrap());
    zoom_spawner.spawn(tasks::zoom_button_task(zoom_out, ZoomDirection::Out).unwrap());

    info!("Tasks spawned, entering navigation loop");

    let screen = BoardScreen::new(
        display,
        u32::from(config.screen.width),
        u32::from(config.screen.map_height),
    );
    tasks::navigation_loop(joystick, controller, routes, screen, BoardClock).await
}

/// Initialize the heap allocator
fn init_heap() {
    use core::mem::MaybeUninit;
    static mut HEAP_MEM: [MaybeUninit<u8>; HEAP_SIZE] = [MaybeUninit::uninit(); HEAP_SIZE];
    #[allow(static_mut_refs)]
    unsafe {
        HEAP.init(HEAP_MEM.as_ptr() as usize, HEAP_SIZE)
    }
}

/// Parse the embedded device.toml
///
/// build.rs already rejected an invalid file, so the fallback only guards
/// against the two parsers drifting apart.
fn load_config() -> NavConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!(
                "Parsed embedded configuration: {} map levels, {} baud",
                config.maps.len(),
                config.serial.baudrate
            );
            config
        }
        Err(e) => {
            warn!("Failed to parse embedded config: {:?}", e);
            warn!("Using built-in defaults");
            NavConfig::default()
        }
    }
}

/// Log and stop for good
///
/// Used when the display or the storage card cannot be brought up; there is
/// nothing useful the device can do without them.
fn fatal_halt(reason: &str) -> ! {
    error!("Fatal: {} unavailable, halting", reason);
    loop {
        cortex_m::asm::wfi();
    }
}
