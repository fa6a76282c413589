//! Line dispatcher
//!
//! The single decode entry point shared by both transports. Applies parsed
//! commands to the telemetry state and returns any reply, addressed to the
//! transport the line came from.

use embassy_sync::blocking_mutex::raw::RawMutex;
use log::debug;

use crate::commands::parser::LineParser;
use crate::commands::types::{Command, Reply, ReplyMessage, TransportId};
use crate::telemetry::state::TelemetryState;

/// Parses lines and applies them to shared state
pub struct LineDispatcher {
    parser: LineParser,
}

impl LineDispatcher {
    /// Create a new line dispatcher
    pub fn new() -> Self {
        Self {
            parser: LineParser::new(),
        }
    }

    /// Parse and apply one complete line.
    ///
    /// Rejected lines are logged and otherwise ignored.
    pub fn handle_line<M: RawMutex>(
        &self,
        line: &[u8],
        origin: TransportId,
        state: &TelemetryState<M>,
    ) -> Option<ReplyMessage> {
        match self.parser.parse(line) {
            Ok(command) => self.dispatch(command, origin, state),
            Err(rejection) => {
                debug!("{:?}: dropped line ({:?})", origin, rejection);
                None
            }
        }
    }

    /// Apply a parsed command and return the reply, if any
    pub fn dispatch<M: RawMutex>(
        &self,
        command: Command,
        origin: TransportId,
        state: &TelemetryState<M>,
    ) -> Option<ReplyMessage> {
        match command {
            Command::SpeedAndNav { speed, nav } => {
                state.set_speed(speed);
                state.set_nav(nav);
                None
            }
            Command::Zone(zone) => {
                state.set_zone(zone);
                None
            }
            Command::Speed(speed) => {
                state.set_speed(speed);
                None
            }
            Command::Nav(nav) => {
                state.set_nav(nav);
                None
            }
            Command::Ping => Some(ReplyMessage {
                destination: origin,
                reply: Reply::Pong,
            }),
        }
    }
}

impl Default for LineDispatcher {
    fn default() -> Self {
        Self::new()
    }
}
