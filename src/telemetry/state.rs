//! Telemetry state shared between the ingress paths and the renderer
//!
//! Every accessor takes the lock for exactly one field. A reader may see
//! zone and speed from different updates; that is accepted. The lock is
//! never held while drawing: the renderer works from a [`TelemetrySnapshot`].

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use heapless::String;

use crate::telemetry::wrap::NavText;

struct Fields {
    zone: Option<u8>,
    speed: Option<i32>,
    nav: NavText,
    telemetry_seen: bool,
}

/// Zone limit, speed and navigation text, last writer wins per field.
pub struct TelemetryState<M: RawMutex> {
    fields: Mutex<M, RefCell<Fields>>,
}

impl<M: RawMutex> TelemetryState<M> {
    /// Create an empty state: no zone, no speed, no navigation text.
    pub const fn new() -> Self {
        Self {
            fields: Mutex::new(RefCell::new(Fields {
                zone: None,
                speed: None,
                nav: NavText {
                    line1: String::new(),
                    line2: String::new(),
                },
                telemetry_seen: false,
            })),
        }
    }

    /// Store a validated zone limit.
    pub fn set_zone(&self, zone: u8) {
        self.fields.lock(|f| f.borrow_mut().zone = Some(zone));
        self.mark_seen();
    }

    /// Store the latest observed speed.
    pub fn set_speed(&self, speed: i32) {
        self.fields.lock(|f| f.borrow_mut().speed = Some(speed));
    }

    /// Replace the navigation text.
    ///
    /// Empty text clears the panel content but does not count as the first
    /// telemetry for the waiting view.
    pub fn set_nav(&self, nav: NavText) {
        let has_text = !nav.is_empty();
        self.fields.lock(|f| f.borrow_mut().nav = nav);
        if has_text {
            self.mark_seen();
        }
    }

    pub fn zone(&self) -> Option<u8> {
        self.fields.lock(|f| f.borrow().zone)
    }

    pub fn speed(&self) -> Option<i32> {
        self.fields.lock(|f| f.borrow().speed)
    }

    pub fn nav(&self) -> NavText {
        self.fields.lock(|f| f.borrow().nav.clone())
    }

    /// True once a valid zone or non-empty navigation text has arrived.
    /// Never goes back to false.
    pub fn telemetry_seen(&self) -> bool {
        self.fields.lock(|f| f.borrow().telemetry_seen)
    }

    /// Copy every field, one lock per field.
    pub fn snapshot(&self) -> TelemetrySnapshot {
        TelemetrySnapshot {
            zone: self.zone(),
            speed: self.speed(),
            nav: self.nav(),
            telemetry_seen: self.telemetry_seen(),
        }
    }

    fn mark_seen(&self) {
        self.fields.lock(|f| f.borrow_mut().telemetry_seen = true);
    }
}

impl<M: RawMutex> Default for TelemetryState<M> {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time copy of [`TelemetryState`] used for one render pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TelemetrySnapshot {
    pub zone: Option<u8>,
    pub speed: Option<i32>,
    pub nav: NavText,
    pub telemetry_seen: bool,
}

impl TelemetrySnapshot {
    /// Speed is above a known zone limit.
    pub fn is_overspeed(&self) -> bool {
        match (self.zone, self.speed) {
            (Some(zone), Some(speed)) => speed > i32::from(zone),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_sync::blocking_mutex::raw::{CriticalSectionRawMutex, NoopRawMutex};

    #[test]
    fn test_starts_empty() {
        let state: TelemetryState<NoopRawMutex> = TelemetryState::new();
        let snap = state.snapshot();

        assert_eq!(snap.zone, None);
        assert_eq!(snap.speed, None);
        assert!(snap.nav.is_empty());
        assert!(!snap.telemetry_seen);
        assert!(!snap.is_overspeed());
    }

    #[test]
    fn test_last_writer_wins() {
        let state: TelemetryState<NoopRawMutex> = TelemetryState::new();

        state.set_zone(50);
        state.set_zone(80);
        state.set_speed(30);
        state.set_speed(-4);

        assert_eq!(state.zone(), Some(80));
        assert_eq!(state.speed(), Some(-4));
    }

    #[test]
    fn test_speed_alone_does_not_end_waiting() {
        let state: TelemetryState<NoopRawMutex> = TelemetryState::new();

        state.set_speed(70);
        assert!(!state.telemetry_seen());

        state.set_nav(NavText::wrap(""));
        assert!(!state.telemetry_seen());

        state.set_nav(NavText::wrap("Exit 4"));
        assert!(state.telemetry_seen());

        // Clearing the text later does not bring the waiting view back
        state.set_nav(NavText::wrap(""));
        assert!(state.telemetry_seen());
    }

    #[test]
    fn test_zone_ends_waiting() {
        let state: TelemetryState<NoopRawMutex> = TelemetryState::new();
        state.set_zone(30);
        assert!(state.telemetry_seen());
    }

    #[test]
    fn test_overspeed() {
        let mut snap = TelemetrySnapshot::default();
        snap.speed = Some(90);
        assert!(!snap.is_overspeed());

        snap.zone = Some(80);
        assert!(snap.is_overspeed());

        snap.speed = Some(80);
        assert!(!snap.is_overspeed());

        snap.speed = None;
        assert!(!snap.is_overspeed());
    }

    #[test]
    fn test_shared_across_threads() {
        static STATE: TelemetryState<CriticalSectionRawMutex> = TelemetryState::new();

        std::thread::scope(|s| {
            s.spawn(|| {
                for speed in 0..500 {
                    STATE.set_speed(speed);
                }
            });
            s.spawn(|| {
                for zone in 1..200u8 {
                    STATE.set_zone(zone);
                }
            });
        });

        assert_eq!(STATE.speed(), Some(499));
        assert_eq!(STATE.zone(), Some(199));
    }
}
