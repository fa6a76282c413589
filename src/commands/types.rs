//! Command, reply and transport types for the line protocol
//!
//! # Protocol Format
//!
//! ASCII lines terminated by `\n` or `\r`. Surrounding whitespace is
//! ignored. Prefixes are case-sensitive and the first match wins:
//!
//! | Line                 | Effect                                        |
//! |----------------------|-----------------------------------------------|
//! | `SPD:<int>\|<text>`  | speed and navigation text in one line         |
//! | `Z:<int>`            | zone limit, kept only when `0 < int < 200`    |
//! | `SPD:<int>`          | speed                                         |
//! | `NAV:<text>`         | navigation text                               |
//! | `PING`               | replies `PONG` on the same transport          |
//!
//! Anything else is ignored. Nothing is ever reported back for a bad line.

use crate::telemetry::wrap::NavText;

/// Identifies the link a line arrived on, so replies go back the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportId {
    /// Bluetooth serial-profile stream
    Spp,
    /// BLE Nordic UART Service
    Ble,
}

/// Parsed command with associated data
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `SPD:<int>|<text>`
    SpeedAndNav { speed: i32, nav: NavText },

    /// `Z:<int>` within range
    Zone(u8),

    /// `SPD:<int>`
    Speed(i32),

    /// `NAV:<text>`
    Nav(NavText),

    /// `PING`
    Ping,
}

/// Why a line produced no command.
///
/// Rejections are for local diagnostics only; the protocol never reports
/// them to the sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Blank after trimming
    Empty,

    /// No known prefix matched
    Unrecognized,

    /// `Z:` value outside the accepted range
    ZoneOutOfRange(i32),
}

/// Reply to a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    /// Answer to `PING`
    Pong,
}

/// A reply addressed to the transport the command came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplyMessage {
    pub destination: TransportId,
    pub reply: Reply,
}
