//! Zoom button tasks
//!
//! Each task waits for falling edges on one zoom button and records them in
//! the shared latch. The tasks run on an interrupt executor above thread
//! mode, so an edge is timestamped and latched even while the navigation
//! loop is blocked on a route request. The loop picks the level up on its
//! next tick.

use defmt::*;
use embassy_executor::{InterruptExecutor, SendSpawner};
use embassy_rp::gpio::Input;
use embassy_rp::interrupt;
use embassy_rp::interrupt::{InterruptExt, Priority};
use embassy_time::Instant;

use waymark_core::input::{ZoomDirection, ZoomLatch};

/// Level requested by the zoom buttons
pub static ZOOM: ZoomLatch = ZoomLatch::new();

static EXECUTOR_ZOOM: InterruptExecutor = InterruptExecutor::new();

#[interrupt]
unsafe fn SWI_IRQ_1() {
    EXECUTOR_ZOOM.on_interrupt()
}

/// Start the executor the zoom tasks run on
///
/// Call once, before spawning the tasks.
pub fn start_zoom_executor() -> SendSpawner {
    interrupt::SWI_IRQ_1.set_priority(Priority::P2);
    EXECUTOR_ZOOM.start(interrupt::SWI_IRQ_1)
}

/// Zoom button task, one instance per direction
#[embassy_executor::task(pool_size = 2)]
pub async fn zoom_button_task(mut button: Input<'static>, direction: ZoomDirection) {
    info!("Zoom {:?} task started", direction);

    loop {
        button.wait_for_falling_edge().await;

        let now_ms = Instant::now().as_millis() as u32;
        if ZOOM.on_edge(direction, now_ms) {
            debug!("Zoom {:?} -> level {}", direction, ZOOM.requested_level());
        } else {
            trace!("Zoom {:?} edge ignored", direction);
        }
    }
}
