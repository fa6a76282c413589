//! HUD controller: render cadence applied to the shared telemetry
//!
//! Owns both panels. Each `tick` is one pass of the control loop's render
//! half; the SPP drain and the loop delay live in the firmware task.

use embassy_sync::blocking_mutex::raw::RawMutex;

use crate::cadence::RenderCadence;
use crate::display::panel::Panel;
use crate::display::render::{HudDisplay, PassReport};
use crate::telemetry::state::TelemetryState;

pub struct HudController<'s, M: RawMutex, P: Panel> {
    state: &'s TelemetryState<M>,
    display: HudDisplay<P>,
    cadence: RenderCadence,
}

impl<'s, M: RawMutex, P: Panel> HudController<'s, M, P> {
    /// Take over initialised panels and put up the waiting view.
    pub fn start(state: &'s TelemetryState<M>, mut display: HudDisplay<P>) -> Result<Self, P::Error> {
        display.show_waiting()?;
        Ok(Self {
            state,
            display,
            cadence: RenderCadence::new(),
        })
    }

    /// Advance the cadence to `now_ms` and redraw if a draw is due.
    ///
    /// Returns `Ok(None)` when no draw was due.
    pub fn tick(&mut self, now_ms: u64) -> Result<Option<PassReport>, P::Error> {
        let tick = self.cadence.poll(now_ms);
        if !tick.draw {
            return Ok(None);
        }

        let snapshot = self.state.snapshot();
        self.display.render(&snapshot, tick.blink_on).map(Some)
    }

    pub fn display(&self) -> &HudDisplay<P> {
        &self.display
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::cadence::{DRAW_PERIOD_MS, LOOP_YIELD_MS};
    use crate::boot::BootError;
    use crate::display::panel::mock::{BusFault, TestPanel, UnpluggedPanel};
    use crate::telemetry::NavText;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;
    use std::vec::Vec;

    fn controller(state: &TelemetryState<NoopRawMutex>) -> HudController<'_, NoopRawMutex, TestPanel> {
        let display = HudDisplay::new(TestPanel::new(), TestPanel::new());
        HudController::start(state, display).unwrap()
    }

    /// Run the loop from `from` to `to` and collect every pass
    fn run(
        hud: &mut HudController<'_, NoopRawMutex, TestPanel>,
        from: u64,
        to: u64,
    ) -> Vec<(u64, PassReport)> {
        (from..=to)
            .step_by(LOOP_YIELD_MS as usize)
            .filter_map(|t| hud.tick(t).unwrap().map(|r| (t, r)))
            .collect()
    }

    #[test]
    fn test_starts_with_waiting_view() {
        let state = TelemetryState::new();
        let hud = controller(&state);

        assert_eq!(hud.display().nav_panel().flushes(), 1);
        assert_eq!(hud.display().zone_panel().flushes(), 1);
    }

    #[test]
    fn test_start_reports_waiting_view_failure() {
        let state: TelemetryState<NoopRawMutex> = TelemetryState::new();
        let display = HudDisplay::new(UnpluggedPanel, UnpluggedPanel);

        let result = HudController::start(&state, display).map(|_| ());
        assert_eq!(result, Err(BusFault));

        // The firmware tags it as its own boot step
        let tagged = BootError::WaitingView.check(result);
        assert_eq!(tagged, Err(BootError::WaitingView));
    }

    #[test]
    fn test_draw_rate() {
        let state = TelemetryState::new();
        state.set_zone(50);
        let mut hud = controller(&state);

        let passes = run(&mut hud, 0, 1200);
        assert_eq!(passes.len(), 10);
        for pair in passes.windows(2) {
            assert!(pair[1].0 - pair[0].0 >= DRAW_PERIOD_MS);
        }
        // Waiting view plus one flush per pass
        assert_eq!(hud.display().zone_panel().flushes(), 11);
    }

    #[test]
    fn test_waiting_until_first_telemetry() {
        let state = TelemetryState::new();
        let mut hud = controller(&state);

        // Speed alone keeps the waiting view
        state.set_speed(80);
        let passes = run(&mut hud, 0, 600);
        assert!(passes.iter().all(|(_, r)| !r.zone_drawn && !r.nav_drawn));
        assert_eq!(hud.display().zone_panel().flushes(), 1);

        state.set_nav(NavText::wrap("Exit 4"));
        let passes = run(&mut hud, 604, 800);
        assert!(passes.iter().all(|(_, r)| r.zone_drawn && r.nav_drawn));
    }

    #[test]
    fn test_overspeed_ring_blinks() {
        let state = TelemetryState::new();
        state.set_zone(50);
        state.set_speed(61);
        let mut hud = controller(&state);

        let passes = run(&mut hud, 0, 5000);

        // Over any 900 ms span the ring is seen both on and off
        for window_start in (0..=4000).step_by(100) {
            let in_window: Vec<bool> = passes
                .iter()
                .filter(|(t, _)| (window_start..=window_start + 900).contains(t))
                .map(|(_, r)| r.ring_shown)
                .collect();
            assert!(in_window.contains(&true), "no ring from {}", window_start);
            assert!(in_window.contains(&false), "ring stuck from {}", window_start);
        }
    }

    #[test]
    fn test_no_ring_within_limit() {
        let state = TelemetryState::new();
        state.set_zone(50);
        state.set_speed(50);
        let mut hud = controller(&state);

        let passes = run(&mut hud, 0, 2000);
        assert!(!passes.is_empty());
        assert!(passes.iter().all(|(_, r)| !r.ring_shown));
    }
}
