//! Navigation loop
//!
//! One tick: sample the joystick, collect a pending zoom change, let the
//! controller act on both (possibly blocking on a route request), then paint
//! whatever changed.

use defmt::*;
use embassy_time::Timer;

use waymark_core::input::Joystick;
use waymark_core::nav::{NavigationController, TickInput};
use waymark_core::route::RouteService;
use waymark_core::traits::{MapScreen, Projection};
use waymark_hal::{AnalogInput, Clock, InputPin};

use super::ZOOM;

/// Delay between ticks in milliseconds
pub const TICK_INTERVAL_MS: u64 = 20;

/// Run the navigation loop forever
pub async fn navigation_loop<X, Y, B, P, R, S, C>(
    mut joystick: Joystick<X, Y, B>,
    mut controller: NavigationController<P>,
    mut routes: R,
    mut screen: S,
    clock: C,
) -> !
where
    X: AnalogInput,
    Y: AnalogInput,
    B: InputPin,
    P: Projection,
    R: RouteService,
    S: MapScreen,
    C: Clock,
{
    info!("Navigation loop started at level {}", controller.level());

    loop {
        let now_ms = clock.now_ms();
        let input = TickInput {
            sample: joystick.sample(now_ms),
            zoom: ZOOM.poll(controller.level()),
            now_ms,
        };

        controller.tick(input, &mut routes);

        if let Err(e) = controller.render(&mut screen) {
            warn!("Render failed: {:?}", e);
        }

        Timer::after_millis(TICK_INTERVAL_MS).await;
    }
}
