//! SPP line reader
//!
//! Drains whatever the SPP link has buffered, frames it into lines and
//! hands each line to the dispatcher. PING replies go straight back out
//! on the same link.

use embassy_sync::blocking_mutex::raw::RawMutex;
use log::warn;

use crate::commands::serialiser::ReplySerialiser;
use crate::commands::types::TransportId;
use crate::config::spp::READ_CHUNK;
use crate::dispatcher::handler::LineDispatcher;
use crate::protocol::framing::LineFramer;
use crate::spp::traits::{LinkError, SppPort};
use crate::telemetry::state::TelemetryState;

/// Result of one drain pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainStats {
    /// Bytes pulled from the link
    pub bytes: usize,
    /// Complete lines handed to the dispatcher
    pub lines: usize,
    /// Replies written back
    pub replies: usize,
}

/// SPP ingress: one framer for the lifetime of the link
pub struct SppReader {
    framer: LineFramer,
    dispatcher: LineDispatcher,
    serialiser: ReplySerialiser,
}

impl SppReader {
    pub fn new() -> Self {
        Self {
            framer: LineFramer::new(),
            dispatcher: LineDispatcher::new(),
            serialiser: ReplySerialiser::new(),
        }
    }

    /// Process every byte currently available on the link.
    ///
    /// Returns once a read comes back empty. A partial line stays in the
    /// framer for the next pass. A failed reply write is logged and the
    /// remaining lines are still processed.
    pub async fn drain<P: SppPort, M: RawMutex>(
        &mut self,
        port: &mut P,
        state: &TelemetryState<M>,
    ) -> Result<DrainStats, LinkError> {
        let mut stats = DrainStats::default();
        let mut buf = [0u8; READ_CHUNK];

        loop {
            let n = port.read_available(&mut buf).await?;
            if n == 0 {
                return Ok(stats);
            }
            stats.bytes += n;

            for line in self.framer.feed(&buf[..n]) {
                stats.lines += 1;
                let Some(msg) = self.dispatcher.handle_line(&line, TransportId::Spp, state) else {
                    continue;
                };

                let encoded = self.serialiser.serialise(&msg.reply, msg.destination);
                match port.write_all(&encoded).await {
                    Ok(()) => stats.replies += 1,
                    Err(e) => warn!("SPP: reply dropped: {:?}", e),
                }
            }
        }
    }

    /// Bytes of an unterminated line waiting for more input
    pub fn pending(&self) -> usize {
        self.framer.len()
    }
}

impl Default for SppReader {
    fn default() -> Self {
        Self::new()
    }
}
