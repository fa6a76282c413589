//! Reply serialiser
//!
//! Encodes replies as text lines for the transport they are sent on.

use crate::commands::types::{Reply, TransportId};
use crate::config::protocol::MAX_REPLY_SIZE;
use heapless::Vec;

/// Serialiser for reply lines
pub struct ReplySerialiser;

impl ReplySerialiser {
    /// Create a new reply serialiser
    pub fn new() -> Self {
        Self
    }

    /// Serialise a reply for the given transport
    ///
    /// SPP replies end in `\r\n` like a serial `println`; BLE notifications
    /// carry a bare `\n`.
    pub fn serialise(&self, reply: &Reply, transport: TransportId) -> Vec<u8, MAX_REPLY_SIZE> {
        let mut out: Vec<u8, MAX_REPLY_SIZE> = Vec::new();

        let body: &[u8] = match reply {
            Reply::Pong => b"PONG",
        };
        let _ = out.extend_from_slice(body);

        let terminator: &[u8] = match transport {
            TransportId::Spp => b"\r\n",
            TransportId::Ble => b"\n",
        };
        let _ = out.extend_from_slice(terminator);

        out
    }
}

impl Default for ReplySerialiser {
    fn default() -> Self {
        Self::new()
    }
}
