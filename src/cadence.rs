//! Render cadence: blink toggling and redraw scheduling
//!
//! Both periodic ticks sample the same millisecond clock once per control
//! loop iteration. A tick fires when at least one period has elapsed since
//! it last fired, so jitter of up to one loop iteration is expected.

use crate::config::cadence::{BLINK_PERIOD_MS, DRAW_PERIOD_MS};

/// Fixed-period tick driven by polling a monotonic clock.
#[derive(Debug, Clone, Copy)]
pub struct PeriodicTick {
    period_ms: u64,
    last_ms: u64,
}

impl PeriodicTick {
    /// Create a tick whose first period is measured from time zero.
    pub const fn new(period_ms: u64) -> Self {
        Self {
            period_ms,
            last_ms: 0,
        }
    }

    /// Returns true and restarts the period if it has elapsed at `now_ms`.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        if now_ms.wrapping_sub(self.last_ms) >= self.period_ms {
            self.last_ms = now_ms;
            true
        } else {
            false
        }
    }
}

/// Outcome of one cadence poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CadenceTick {
    /// A render pass is due
    pub draw: bool,
    /// Current phase of the overspeed blink
    pub blink_on: bool,
}

/// Blink and draw timers sharing one clock.
#[derive(Debug, Clone, Copy)]
pub struct RenderCadence {
    blink: PeriodicTick,
    draw: PeriodicTick,
    blink_on: bool,
}

impl RenderCadence {
    pub const fn new() -> Self {
        Self::with_periods(BLINK_PERIOD_MS, DRAW_PERIOD_MS)
    }

    pub const fn with_periods(blink_period_ms: u64, draw_period_ms: u64) -> Self {
        Self {
            blink: PeriodicTick::new(blink_period_ms),
            draw: PeriodicTick::new(draw_period_ms),
            blink_on: false,
        }
    }

    /// Advance both timers to `now_ms`.
    ///
    /// The blink phase is updated before the draw decision so a pass drawn
    /// at the same instant already sees the new phase.
    pub fn poll(&mut self, now_ms: u64) -> CadenceTick {
        if self.blink.poll(now_ms) {
            self.blink_on = !self.blink_on;
        }

        CadenceTick {
            draw: self.draw.poll(now_ms),
            blink_on: self.blink_on,
        }
    }
}

impl Default for RenderCadence {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::cadence::LOOP_YIELD_MS;

    #[test]
    fn test_tick_waits_for_period() {
        let mut tick = PeriodicTick::new(120);

        assert!(!tick.poll(0));
        assert!(!tick.poll(119));
        assert!(tick.poll(120));
        assert!(!tick.poll(200));
        assert!(tick.poll(245));
    }

    #[test]
    fn test_tick_restarts_from_fire_time() {
        let mut tick = PeriodicTick::new(100);

        // A late poll pushes the next deadline out
        assert!(tick.poll(150));
        assert!(!tick.poll(249));
        assert!(tick.poll(250));
    }

    #[test]
    fn test_tick_survives_clock_wrap() {
        let mut tick = PeriodicTick::new(100);
        assert!(tick.poll(u64::MAX - 10));
        assert!(!tick.poll(u64::MAX));
        assert!(tick.poll(89));
    }

    #[test]
    fn test_blink_toggles_every_period() {
        let mut cadence = RenderCadence::new();

        assert!(!cadence.poll(449).blink_on);
        assert!(cadence.poll(450).blink_on);
        assert!(cadence.poll(899).blink_on);
        assert!(!cadence.poll(900).blink_on);
    }

    #[test]
    fn test_draw_independent_of_blink() {
        let mut cadence = RenderCadence::new();

        let draws = (0..=1200)
            .step_by(LOOP_YIELD_MS as usize)
            .filter(|&t| cadence.poll(t).draw)
            .count();

        // Draws at 120, 240, ... 1200
        assert_eq!(draws, 10);
    }

    #[test]
    fn test_blink_visible_and_hidden_within_window() {
        // Any 900 ms window of draw samples sees both phases
        for start in (0..2000u64).step_by(37) {
            let mut cadence = RenderCadence::new();
            let mut seen_on = false;
            let mut seen_off = false;

            let mut now = 0;
            while now <= start + 900 {
                let tick = cadence.poll(now);
                if tick.draw && now >= start {
                    seen_on |= tick.blink_on;
                    seen_off |= !tick.blink_on;
                }
                now += LOOP_YIELD_MS;
            }

            assert!(seen_on && seen_off, "window starting at {} ms", start);
        }
    }
}
