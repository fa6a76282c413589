//! HUD control loop
//!
//! One cooperative loop: drain the SPP link, let the render cadence decide
//! whether to draw, then yield for a few milliseconds. BLE ingress runs in
//! its own task and only touches the shared state.

use core::fmt::Debug;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_time::{Instant, Timer};
use log::warn;

use crate::config::cadence::LOOP_YIELD_MS;
use crate::display::Panel;
use crate::hud::HudController;
use crate::spp::{SppPort, SppReader};
use crate::telemetry::TelemetryState;

/// Run the control loop forever.
///
/// Link and draw errors are logged and the loop carries on.
pub async fn hud_task<S, P>(
    state: &'static TelemetryState<CriticalSectionRawMutex>,
    mut spp: S,
    mut hud: HudController<'static, CriticalSectionRawMutex, P>,
) -> !
where
    S: SppPort,
    P: Panel,
    P::Error: Debug,
{
    let mut reader = SppReader::new();

    loop {
        if let Err(e) = reader.drain(&mut spp, state).await {
            warn!("SPP: read failed: {:?}", e);
        }

        if let Err(e) = hud.tick(Instant::now().as_millis()) {
            warn!("HUD: draw failed: {:?}", e);
        }

        Timer::after_millis(LOOP_YIELD_MS).await;
    }
}
